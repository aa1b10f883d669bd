// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end reassembly flow: decoder-side production, merge across
//! arrival events, queued delivery, and pool accounting.

use muxbuf::{DeliveryStatus, Error, PacketBuffers, PacketQueue};

const CAP: usize = 8;
type Buffers = PacketBuffers<CAP, 16, 8>;

/// Split `payload` into CAP-sized fragments and append them to a new chain,
/// the way the mux decoder does per arrival event.
fn produce(buffers: &mut Buffers, payload: &[u8]) -> muxbuf::ChainId {
    let chain = buffers.alloc_chain().unwrap();
    for part in payload.chunks(CAP) {
        let frag = buffers.alloc_fragment().unwrap();
        buffers.fill_fragment(frag, part).unwrap();
        buffers.append(chain, frag).unwrap();
    }
    chain
}

#[test]
fn test_packet_split_across_arrival_events() {
    let mut buffers = Buffers::new();
    let mut queue = PacketQueue::new();

    // One logical packet arrives in three bursts; the decoder accumulates
    // each burst in its own chain and merges into the packet under assembly.
    let packet = produce(&mut buffers, b"GET http://example");
    let burst2 = produce(&mut buffers, b".com/ HTTP");
    let burst3 = produce(&mut buffers, b"/1.1");
    buffers.merge(packet, burst2).unwrap();
    buffers.merge(packet, burst3).unwrap();

    buffers.set_channel(packet, 1).unwrap();
    buffers.enqueue_packet(&mut queue, packet).unwrap();

    let mut out = [0u8; 64];
    let d = buffers.dequeue_consume(&mut queue, &mut out).unwrap();
    assert_eq!(d.status, DeliveryStatus::Complete);
    assert_eq!(d.channel, 1);
    assert_eq!(&out[..d.bytes], b"GET http://example.com/ HTTP/1.1");

    assert_eq!(buffers.free_fragments(), 16);
    assert_eq!(buffers.free_chains(), 8);
}

#[test]
fn test_interleaved_channels_deliver_in_completion_order() {
    let mut buffers = Buffers::new();
    let mut queue = PacketQueue::new();

    // Two channels assemble concurrently; channel 2 completes first.
    let ch1 = produce(&mut buffers, b"first-half-");
    let ch2 = produce(&mut buffers, b"pong");
    buffers.set_channel(ch1, 1).unwrap();
    buffers.set_channel(ch2, 2).unwrap();

    buffers.enqueue_packet(&mut queue, ch2).unwrap();

    let tail = produce(&mut buffers, b"second-half");
    buffers.merge(ch1, tail).unwrap();
    buffers.enqueue_packet(&mut queue, ch1).unwrap();

    let mut out = [0u8; 64];
    let d = buffers.dequeue_consume(&mut queue, &mut out).unwrap();
    assert_eq!(d.channel, 2);
    assert_eq!(&out[..d.bytes], b"pong");

    let d = buffers.dequeue_consume(&mut queue, &mut out).unwrap();
    assert_eq!(d.channel, 1);
    assert_eq!(&out[..d.bytes], b"first-half-second-half");
}

#[test]
fn test_exhaustion_backpressure_and_recovery() {
    let mut small: PacketBuffers<4, 2, 2> = PacketBuffers::new();
    let mut queue = PacketQueue::new();

    let chain = small.alloc_chain().unwrap();
    for _ in 0..2 {
        let frag = small.alloc_fragment().unwrap();
        small.fill_fragment(frag, b"xxxx").unwrap();
        small.append(chain, frag).unwrap();
    }

    // Producer hits the wall and must stop filling
    assert_eq!(small.alloc_fragment(), Err(Error::NoMemory));

    small.enqueue_packet(&mut queue, chain).unwrap();
    let mut out = [0u8; 16];
    small.dequeue_consume(&mut queue, &mut out).unwrap();

    // Delivery returned the blocks; production can resume
    assert!(small.alloc_fragment().is_ok());
}

#[test]
fn test_truncation_loses_tail_permanently() {
    let mut buffers = Buffers::new();
    let mut queue = PacketQueue::new();

    let chain = produce(&mut buffers, b"0123456789abcdef");
    buffers.enqueue_packet(&mut queue, chain).unwrap();
    let next = produce(&mut buffers, b"next");
    buffers.enqueue_packet(&mut queue, next).unwrap();

    let mut small = [0u8; 4];
    let d = buffers.dequeue_consume(&mut queue, &mut small).unwrap();
    assert_eq!(d.status, DeliveryStatus::Truncated);
    assert_eq!(&small, b"0123");

    // The follow-up dequeue surfaces the next packet, not the lost tail
    let mut out = [0u8; 16];
    let d = buffers.dequeue_consume(&mut queue, &mut out).unwrap();
    assert_eq!(d.status, DeliveryStatus::Complete);
    assert_eq!(&out[..d.bytes], b"next");
}

#[test]
fn test_random_partitions_roundtrip() {
    fastrand::seed(0x6d75_7862);

    for _ in 0..50 {
        // Worst case is one byte per fragment, so the pool must cover `len`
        let mut buffers: PacketBuffers<8, 64, 4> = PacketBuffers::new();
        let mut queue = PacketQueue::new();

        let len = fastrand::usize(1..=64);
        let payload: Vec<u8> = (0..len).map(|_| fastrand::u8(..)).collect();

        // Partition the payload at random points, one fragment per piece
        let chain = buffers.alloc_chain().unwrap();
        let mut offset = 0;
        while offset < payload.len() {
            let take = fastrand::usize(1..=CAP.min(payload.len() - offset));
            let frag = buffers.alloc_fragment().unwrap();
            buffers
                .fill_fragment(frag, &payload[offset..offset + take])
                .unwrap();
            buffers.append(chain, frag).unwrap();
            offset += take;
        }
        assert_eq!(buffers.chain_len(chain).unwrap(), payload.len());

        buffers.enqueue_packet(&mut queue, chain).unwrap();
        let mut out = vec![0u8; payload.len()];
        let d = buffers.dequeue_consume(&mut queue, &mut out).unwrap();

        assert_eq!(d.status, DeliveryStatus::Complete);
        assert_eq!(d.bytes, payload.len());
        assert_eq!(out, payload);
        assert_eq!(buffers.free_fragments(), 64);
    }
}

#[test]
fn test_incremental_drain_preserves_order() {
    let mut buffers = Buffers::new();

    let payload = b"the quick brown fox jumps over the lazy dog";
    let chain = produce(&mut buffers, payload);

    // Drain three bytes at a time through the chain-level API
    let mut collected = Vec::new();
    let mut buf = [0u8; 3];
    loop {
        let n = buffers.consume_bytes(chain, &mut buf).unwrap();
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }

    assert_eq!(collected, payload);
    assert_eq!(buffers.chain_len(chain).unwrap(), 0);
    buffers.free_chain(chain).unwrap();
    assert_eq!(buffers.free_fragments(), 16);
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream Reassembly Example
//!
//! Simulates a mux decoder feeding interleaved channel fragments into the
//! buffer pools and a consumer draining completed packets.
//!
//! ## Usage
//!
//! ```sh
//! cargo run --example stream_reassembly --features std
//! ```

use muxbuf::{ChainId, DeliveryStatus, PacketBuffers, PacketQueue, Result};

/// Fragment payload capacity, matching the transport's receive block
const CAP: usize = 16;

type Buffers = PacketBuffers<CAP, 32, 8>;

/// One decoded arrival event: a channel tag, a slice of payload bytes, and
/// whether the mux protocol marked this as the end of the packet.
struct Event<'a> {
    channel: u8,
    bytes: &'a [u8],
    last: bool,
}

/// Minimal stand-in for the mux decoder's per-channel assembly state
struct Assembler {
    open: [Option<ChainId>; 4],
}

impl Assembler {
    fn new() -> Self {
        Self { open: [None; 4] }
    }

    /// Feed one arrival event; enqueues the chain when the packet completes
    fn feed(
        &mut self,
        buffers: &mut Buffers,
        queue: &mut PacketQueue,
        event: &Event<'_>,
    ) -> Result<()> {
        let slot = usize::from(event.channel) % self.open.len();

        let chain = match self.open[slot] {
            Some(chain) => chain,
            None => {
                let chain = buffers.alloc_chain()?;
                buffers.set_channel(chain, event.channel)?;
                self.open[slot] = Some(chain);
                chain
            }
        };

        for part in event.bytes.chunks(CAP) {
            let frag = buffers.alloc_fragment()?;
            buffers.fill_fragment(frag, part)?;
            buffers.append(chain, frag)?;
        }

        if event.last {
            buffers.enqueue_packet(queue, chain)?;
            self.open[slot] = None;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut buffers = Buffers::new();
    let mut queue = PacketQueue::new();
    let mut assembler = Assembler::new();

    // Two channels interleaved on the wire, as a serial mux would deliver them
    let events = [
        Event { channel: 1, bytes: b"+USORD: 0,24,\"half of the ", last: false },
        Event { channel: 2, bytes: b"OK\r\n", last: true },
        Event { channel: 1, bytes: b"response text\"\r\n", last: true },
    ];

    for event in &events {
        assembler.feed(&mut buffers, &mut queue, event)?;
        println!(
            "fed {:2} bytes on channel {} ({} fragment slots free)",
            event.bytes.len(),
            event.channel,
            buffers.free_fragments()
        );
    }

    let mut out = [0u8; 128];
    while !queue.is_empty() {
        let delivery = buffers.dequeue_consume(&mut queue, &mut out)?;
        println!(
            "channel {}: {} bytes ({:?}): {:?}",
            delivery.channel,
            delivery.bytes,
            delivery.status,
            String::from_utf8_lossy(&out[..delivery.bytes])
        );
        assert_eq!(delivery.status, DeliveryStatus::Complete);
    }

    println!(
        "done, pools back to {}/{} fragments free",
        buffers.free_fragments(),
        32
    );
    Ok(())
}

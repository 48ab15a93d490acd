// ── Wake-on-LAN ──
//
// The one action that does not touch the NanoKVM at all: a magic packet
// broadcast on the local segment wakes the attached host directly.

use std::fmt;
use std::str::FromStr;

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::CoreError;

/// Magic packet layout: 6 sync bytes then the MAC sixteen times.
const PACKET_LEN: usize = 6 + 16 * 6;

/// UDP discard port, the conventional WoL target.
const WOL_PORT: u16 = 9;

/// A strictly validated hardware address.
///
/// Accepts only the `HH:HH:HH:HH:HH:HH` hex-pair form; anything looser
/// is rejected before a packet can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');

        for octet in &mut octets {
            let part = parts.next().ok_or_else(|| bad_mac(s))?;
            // from_str_radix alone would admit signs like "+f".
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad_mac(s));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| bad_mac(s))?;
        }

        if parts.next().is_some() {
            return Err(bad_mac(s));
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

fn bad_mac(s: &str) -> CoreError {
    CoreError::validation("mac", format!("\"{s}\" is not of the form HH:HH:HH:HH:HH:HH"))
}

/// Build the 102-byte magic packet for `mac`.
pub fn magic_packet(mac: &MacAddress) -> [u8; PACKET_LEN] {
    let mut packet = [0xFFu8; PACKET_LEN];
    for repeat in 0..16 {
        let start = 6 + repeat * 6;
        packet[start..start + 6].copy_from_slice(&mac.octets());
    }
    packet
}

/// Broadcast a magic packet for `mac` on the local segment.
pub async fn send(mac: &MacAddress) -> Result<(), CoreError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.set_broadcast(true)?;

    let packet = magic_packet(mac);
    socket.send_to(&packet, ("255.255.255.255", WOL_PORT)).await?;

    debug!(%mac, "wake-on-lan packet sent");
    Ok(())
}

//! Serial-bus servo framing and the transmit side of the half-duplex link.
//!
//! One position write is a 14-byte instruction frame:
//!
//! | bytes | meaning |
//! |---|---|
//! | `FF FF` | header |
//! | `id` | servo address |
//! | `0A` | length (parameters + 2) |
//! | `03` | WRITE instruction |
//! | `29` | first register: acceleration |
//! | `acc` | acceleration |
//! | `posL posH` | goal position, little-endian |
//! | `00 00` | goal time (unused, speed governs) |
//! | `spdL spdH` | goal speed, little-endian |
//! | `chk` | `!(id + len + instruction + parameters)` |

pub const FRAME_HEADER: u8 = 0xFF;
pub const INSTRUCTION_WRITE: u8 = 0x03;
pub const REGISTER_ACCELERATION: u8 = 0x29;
pub const POSITION_WRITE_LEN: usize = 14;

const PARAMETER_COUNT: u8 = 8;

/// Encode a position write for the servo at `address`.
#[must_use]
pub fn encode_position_write(
    address: u8,
    position: u16,
    speed: u16,
    accel: u8,
) -> [u8; POSITION_WRITE_LEN] {
    let [position_low, position_high] = position.to_le_bytes();
    let [speed_low, speed_high] = speed.to_le_bytes();
    let mut frame = [
        FRAME_HEADER,
        FRAME_HEADER,
        address,
        PARAMETER_COUNT.wrapping_add(2),
        INSTRUCTION_WRITE,
        REGISTER_ACCELERATION,
        accel,
        position_low,
        position_high,
        0,
        0,
        speed_low,
        speed_high,
        0,
    ];
    let (body, checksum) = frame.split_at_mut(POSITION_WRITE_LEN - 1);
    if let (Some(summed), [checksum]) = (body.get(2..), checksum) {
        *checksum = !summed.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    }
    frame
}

/// Transmit side of the bus link: a blocking UART at 1 Mbaud.
///
/// Writes never wait for a status packet, so one frame costs about 140 µs on the wire.
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub struct BusServoLink<'d> {
    uart: embassy_rp::uart::UartTx<'d, embassy_rp::uart::Blocking>,
}

#[cfg(any(feature = "pico1", feature = "pico2"))]
impl<'d> BusServoLink<'d> {
    #[must_use]
    pub const fn new(uart: embassy_rp::uart::UartTx<'d, embassy_rp::uart::Blocking>) -> Self {
        Self { uart }
    }

    /// UART settings for the bus.
    #[must_use]
    pub fn uart_config() -> embassy_rp::uart::Config {
        let mut config = embassy_rp::uart::Config::default();
        config.baudrate = crate::shared_constants::BUS_SERVO_BAUD;
        config
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::BusWrite`] if the UART reports a failure.
    pub fn write_position(
        &mut self,
        address: u8,
        position: u16,
        speed: u16,
        accel: u8,
    ) -> crate::Result<()> {
        let frame = encode_position_write(address, position, speed, accel);
        self.uart
            .blocking_write(&frame)
            .and_then(|()| self.uart.blocking_flush())
            .map_err(|_| crate::Error::BusWrite(address))
    }
}

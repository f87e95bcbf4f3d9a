//! The two tasks around [`ArmController`]: a receiver that frames inbound bytes into lines,
//! and the fixed-cadence control loop that consumes them.
//!
//! The receiver may block on the link; the control loop never does. It takes at most one
//! queued line per tick with `try_receive`, so a burst of commands is processed one per
//! tick in arrival order.

use core::fmt::{Display, Write as _};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Instant, Timer};
use embedded_io_async::{Read, Write};
use heapless::String;

use crate::actuator::ActuatorWriter;
use crate::controller::ArmController;
use crate::line_reader::{InboundLine, LineReader};
use crate::logging::{error, info, warn};
use crate::shared_constants::{COMMAND_QUEUE_DEPTH, STATUS_LINE_CAPACITY, TICK_PERIOD};

/// Completed lines waiting for the control loop.
pub type CommandQueue = Channel<CriticalSectionRawMutex, InboundLine, COMMAND_QUEUE_DEPTH>;

/// Static resources for the command link.
pub struct CommandLinkStatic {
    lines: CommandQueue,
}

impl CommandLinkStatic {
    /// Create static resources for the command link.
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            lines: Channel::new(),
        }
    }

    #[must_use]
    pub const fn lines(&'static self) -> &'static CommandQueue {
        &self.lines
    }
}

/// Read the command link forever, queueing each completed line.
pub async fn receive_lines<R: Read>(mut reader: R, lines: &CommandQueue) -> ! {
    let mut line_reader = LineReader::new();
    let mut buffer = [0_u8; 32];
    loop {
        let count = match reader.read(&mut buffer).await {
            Ok(count) => count,
            Err(_) => {
                warn!("command link read error");
                continue;
            }
        };
        for byte in buffer.iter().take(count) {
            if let Some(line) = line_reader.push(*byte) {
                lines.send(line).await;
            }
        }
    }
}

/// Home the arm, then tick forever.
pub async fn run_control_loop<const N: usize, A, W>(
    mut controller: ArmController<N>,
    lines: &CommandQueue,
    mut actuators: A,
    mut writer: W,
) -> !
where
    A: ActuatorWriter,
    W: Write,
{
    controller.start(Instant::now());
    info!("control loop running, tick={}ms", TICK_PERIOD.as_millis());

    let mut status_line = String::<STATUS_LINE_CAPACITY>::new();
    loop {
        let inbound = lines.try_receive().ok();
        if inbound.as_ref().is_some_and(|line| line.truncated) {
            controller.note_truncated_line();
        }
        let output = controller.tick(
            inbound.as_ref().map(|line| line.text.as_str()),
            Instant::now(),
            &mut actuators,
        );
        if output.report.failures > 0 {
            error!("{} actuator writes failed this tick", output.report.failures);
        }
        if let Some(reply) = output.reply {
            send_line(&mut writer, &mut status_line, &reply).await;
        }
        if let Some(stream) = output.stream {
            send_line(&mut writer, &mut status_line, &stream).await;
        }
        Timer::after(TICK_PERIOD).await;
    }
}

async fn send_line<W: Write, const CAP: usize>(
    writer: &mut W,
    buffer: &mut String<CAP>,
    line: &impl Display,
) {
    buffer.clear();
    if write!(buffer, "{line}\r\n").is_err() {
        warn!("status line longer than {} bytes dropped", CAP);
        return;
    }
    if writer.write_all(buffer.as_bytes()).await.is_err() {
        warn!("command link write error");
    }
}

//! Arm controller firmware: commands in over UART0, motion out over PWM and the servo bus.
//!
//! Wiring (Pico / Pico 2):
//! - GPIO 16 / 17: command link TX / RX, 115200 baud
//! - GPIO 0 / 1: joints 1 and 2 (PWM servos)
//! - GPIO 4: servo bus TX, 1 Mbaud, joints 3..=7
//!
//! Try `readall`, `stream on`, `1 45`, `speed 60`, `4 -30 800`, `stats`.

#![no_std]
#![no_main]
#![feature(never_type)]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use arm_kit::bus_servo::BusServoLink;
use arm_kit::control_loop::{CommandQueue, receive_lines, run_control_loop};
use arm_kit::{
    ARM_JOINTS, ArmActuators, ArmController, COMMAND_LINK_BAUD, CommandLinkStatic, JOINT_COUNT,
    Result,
};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{
    self, BufferedInterruptHandler, BufferedUart, BufferedUartRx, BufferedUartTx, UartTx,
};
use panic_probe as _;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<!> {
    info!("Starting arm controller");
    let peripherals = embassy_rp::init(Default::default());

    // Command link: buffered so bytes arriving mid-tick are kept.
    static TX_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    static RX_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    let mut link_config = uart::Config::default();
    link_config.baudrate = COMMAND_LINK_BAUD;
    let command_link = BufferedUart::new(
        peripherals.UART0,
        peripherals.PIN_16, // TX
        peripherals.PIN_17, // RX
        Irqs,
        TX_BUFFER.init([0; 256]),
        RX_BUFFER.init([0; 256]),
        link_config,
    );
    let (link_tx, link_rx) = command_link.split();

    // Actuators: one PWM slice for both hobby servos, UART1 TX for the bus.
    let pwm = Pwm::new_output_ab(
        peripherals.PWM_SLICE0,
        peripherals.PIN_0,
        peripherals.PIN_1,
        pwm::Config::default(),
    );
    let bus = BusServoLink::new(UartTx::new_blocking(
        peripherals.UART1,
        peripherals.PIN_4,
        BusServoLink::uart_config(),
    ));
    let actuators = ArmActuators::new(pwm, bus)?;

    static COMMAND_LINK_STATIC: CommandLinkStatic = CommandLinkStatic::new_static();
    let lines = COMMAND_LINK_STATIC.lines();

    let token = command_rx_task(link_rx, lines)?;
    spawner.spawn(token);

    let controller = ArmController::new(ARM_JOINTS);
    let token = control_task(controller, lines, actuators, link_tx)?;
    spawner.spawn(token);

    info!("arm controller ready: {} joints", JOINT_COUNT);
    core::future::pending().await
}

#[embassy_executor::task]
async fn command_rx_task(link_rx: BufferedUartRx, lines: &'static CommandQueue) -> ! {
    receive_lines(link_rx, lines).await
}

#[embassy_executor::task]
async fn control_task(
    controller: ArmController<JOINT_COUNT>,
    lines: &'static CommandQueue,
    actuators: ArmActuators<'static>,
    link_tx: BufferedUartTx,
) -> ! {
    run_control_loop(controller, lines, actuators, link_tx).await
}

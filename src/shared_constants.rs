use embassy_time::Duration;

// The arm: two PWM servos followed by five serial-bus servos.
pub const JOINT_COUNT: usize = 7;
pub const PWM_JOINT_COUNT: usize = 2;

/// Minimum delay between two control loop iterations.
pub const TICK_PERIOD: Duration = Duration::from_millis(5);
/// Cadence of `rt` lines while streaming is on (50 Hz).
pub const FEEDBACK_PERIOD: Duration = Duration::from_millis(20);

pub const MIN_MOTION_DURATION: Duration = Duration::from_millis(100);
pub const MAX_MOTION_DURATION: Duration = Duration::from_millis(10_000);
pub const DEFAULT_FALLBACK_DURATION: Duration = Duration::from_millis(1200);

pub const MIN_SPEED_DEG_PER_SEC: f32 = 1.0;
pub const MAX_SPEED_DEG_PER_SEC: f32 = 180.0;
pub const DEFAULT_SPEED_DEG_PER_SEC: f32 = 30.0;
pub const DEFAULT_BLEND_ALPHA: f32 = 0.25;

/// Bytes kept for one inbound command line, terminator excluded.
pub const COMMAND_LINE_CAPACITY: usize = 64;
/// Room for the longest outbound line (`fb`/`rt` with every joint, or `stats`).
pub const STATUS_LINE_CAPACITY: usize = 128;
/// Completed command lines waiting for the control loop.
pub const COMMAND_QUEUE_DEPTH: usize = 4;

pub const COMMAND_LINK_BAUD: u32 = 115_200;
pub const BUS_SERVO_BAUD: u32 = 1_000_000;

/// Goal speed sent with every bus write (the servo's own maximum).
pub const BUS_SERVO_SPEED: u16 = 3400;
/// Goal acceleration sent with every bus write.
pub const BUS_SERVO_ACCEL: u8 = 50;

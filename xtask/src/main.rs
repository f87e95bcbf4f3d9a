//! Build automation tasks for the arm-kit project.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for arm-kit project", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: build lib and firmware for both boards, run host tests, generate docs
    CheckAll,
    /// Run the host test suite (no hardware needed)
    Test,
    /// Build library for a board
    Build {
        #[arg(long, default_value = "pico1")]
        board: Board,
    },
    /// Build a firmware example
    Example {
        /// Example name (e.g., arm_controller)
        #[arg(default_value = "arm_controller")]
        name: String,
        #[arg(long, default_value = "pico1")]
        board: Board,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        /// Example name (e.g., arm_controller)
        #[arg(default_value = "arm_controller")]
        name: String,
        #[arg(long, default_value = "pico1")]
        board: Board,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Board {
    Pico1,
    Pico2,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::Pico1 => write!(f, "pico1"),
            Board::Pico2 => write!(f, "pico2"),
        }
    }
}

impl Board {
    fn target(self) -> &'static str {
        match self {
            Board::Pico1 => "thumbv6m-none-eabi",
            Board::Pico2 => "thumbv8m.main-none-eabihf",
        }
    }

    fn features(self) -> String {
        format!("{self},arm,defmt")
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Test => {
            if run_host_tests() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Build { board } => build_lib(board),
        Commands::Example { name, board } => build_example(&name, board),
        Commands::Uf2 { name, board } => build_uf2(&name, board),
    }
}

fn check_all() -> ExitCode {
    for board in [Board::Pico1, Board::Pico2] {
        println!("{}", format!("==> Building library ({board})...").cyan());
        if !cargo_for_board(&["build", "--lib"], board) {
            return ExitCode::FAILURE;
        }

        println!("\n{}", format!("==> Building firmware ({board})...").cyan());
        if !cargo_for_board(&["build", "--example", "arm_controller"], board) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Running host tests...".cyan());
    if !run_host_tests() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !cargo_for_board(&["doc", "--no-deps"], Board::Pico1) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn run_host_tests() -> bool {
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(workspace_root())
        .args(["test", "--lib", "--tests"]);

    if let Some(target) = host_target {
        test_cmd.arg("--target").arg(target);
    }

    test_cmd.args(["--no-default-features", "--features", "host"]);
    run_command(&mut test_cmd)
}

fn build_lib(board: Board) -> ExitCode {
    println!(
        "{}",
        format!("Building library with features: {}", board.features()).cyan()
    );
    if cargo_for_board(&["build", "--lib"], board) {
        println!("{}", "Build successful!".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_example(name: &str, board: Board) -> ExitCode {
    println!(
        "{}",
        format!(
            "Building example '{name}' with features: {}",
            board.features()
        )
        .cyan()
    );
    if cargo_for_board(&["build", "--example", name], board) {
        println!("{}", "Build successful!".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_uf2(name: &str, board: Board) -> ExitCode {
    let target = board.target();
    println!(
        "{}",
        format!("Building UF2 for example '{name}' ({board})").cyan()
    );
    println!("  Features: {}", board.features().bright_black());
    println!("  Target: {}", target.bright_black());

    // Build in release mode for UF2
    if !cargo_for_board(&["build", "--example", name, "--release"], board) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{target}/release/examples/{name}");
    let uf2_path = format!("{name}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path}").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn cargo_for_board(args: &[&str], board: Board) -> bool {
    let features = board.features();
    run_command(
        Command::new("cargo")
            .current_dir(workspace_root())
            .args(args)
            .args([
                "--target",
                board.target(),
                "--features",
                &features,
                "--no-default-features",
            ]),
    )
}

fn workspace_root() -> std::path::PathBuf {
    // cargo runs xtask from the workspace root via the alias
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}

//! Plain-terminal output used outside the full-screen menu.

use cliclack::{intro, log, outro, outro_cancel};

pub fn print_banner() {
    // intro prints the title in a nice styled badge
    intro(" EHRPLUS ").ok();
    log::remark("Interactive demo of the terminal menu").ok();
}

pub fn print_success(message: &str) {
    log::success(message).ok();
}

pub fn print_error(message: &str) {
    log::error(message).ok();
}

pub fn print_info(message: &str) {
    log::info(message).ok();
}

pub fn print_outro(msg: &str) {
    outro(msg).ok();
}

pub fn print_cancelled(msg: &str) {
    outro_cancel(msg).ok();
}

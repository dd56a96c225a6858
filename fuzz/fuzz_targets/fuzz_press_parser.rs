#![no_main]
use libfuzzer_sys::fuzz_target;
use lift_core::{Controller, ScheduledPress};

fuzz_target!(|data: &str| {
    // Whatever parses must be safe to feed to a controller.
    for line in data.lines().take(16) {
        if let Ok(p) = line.parse::<ScheduledPress>() {
            let mut ctrl = Controller::new();
            let _ = ctrl.press(p.press);
            let _ = ctrl.tick(lift_core::consts::TICK);
        }
    }
});

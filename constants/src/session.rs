/// Frame ticks to wait after stopping tracking before it is initialized again.
/// Replaces the half-second subsystem restart delay used on device.
pub const RESTART_SETTLE_FRAMES: u32 = 2;

/// Frame ticks a simulated scene load stays pending before it completes.
pub const SIMULATED_LOAD_FRAMES: u32 = 1;

//! Host handshake trait

/// Trait for the shared-memory token handshake with the host driver
///
/// Every command the host smuggles over the bus carries a random token.
/// After handling a command the firmware echoes that token back and
/// publishes a fresh one, which the host polls for to pace itself and
/// to detect a wedged firmware.
pub trait TokenHandshake {
    /// Write the token echoed back from the last handled command
    fn write_echo(&mut self, token: u32);

    /// Write the token the host must use for its next command
    fn write_seed(&mut self, token: u32);
}

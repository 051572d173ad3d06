/// Menu actions forwarded by the tray frontend to the main dispatch loop.
///
/// The frontend may deliver these from any thread; the main loop is the only
/// consumer.
pub enum MenuEvent {
    /// "Kill All '<process>' processes" was clicked.
    KillAll,
    /// "Exit" was clicked (or the process received Ctrl+C).
    Exit,
}

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Windows executables carry this suffix; the settings file may omit it.
const EXE_SUFFIX: &str = ".exe";

/// Scans the live process table for processes matching a configured name.
///
/// Results are pids only, valid until the next refresh. Process identity is
/// not stable across scans (the OS may reuse pids), so callers must never
/// cache handles between calls.
pub struct ProcessMatcher {
    sys: System,
}

impl ProcessMatcher {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// Refreshes the full process table once and returns the pids whose name
    /// matches `target`. Empty when nothing matches. Processes that vanish
    /// mid-enumeration simply drop out of the table; that is not an error.
    pub fn find(&mut self, target: &str) -> Vec<Pid> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let mut pids: Vec<Pid> = self
            .sys
            .processes()
            .iter()
            .filter(|(_, p)| name_matches(&p.name().to_string_lossy(), target))
            .map(|(pid, _)| *pid)
            .collect();
        pids.sort_unstable();
        pids
    }

    /// Sends a kill to `pid` if it is still present in the last refreshed
    /// table. Fire-and-forget: `false` means the process was already gone or
    /// the signal could not be delivered, and the next scan will tell.
    pub fn kill(&self, pid: Pid) -> bool {
        self.sys.process(pid).is_some_and(|p| p.kill())
    }
}

/// Exact name match, tolerating the Windows executable suffix: a target of
/// "foo" matches both "foo" and "foo.exe".
pub fn name_matches(process_name: &str, target: &str) -> bool {
    process_name == target
        || process_name
            .strip_suffix(EXE_SUFFIX)
            .is_some_and(|stem| stem == target)
}

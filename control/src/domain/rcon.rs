//! Remote console command session state.

/// Flags of the last remote-console command.
///
/// `succeeded` and `failed` are never both set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RconState {
    pub executing: bool,
    pub succeeded: bool,
    pub failed: bool,
}

impl RconState {
    pub(crate) fn begin(&mut self) {
        self.executing = true;
        self.succeeded = false;
        self.failed = false;
    }

    pub(crate) fn finish(&mut self, ok: bool) {
        self.executing = false;
        self.succeeded = ok;
        self.failed = !ok;
    }
}

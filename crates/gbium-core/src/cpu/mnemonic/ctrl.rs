use tracing::debug;

use crate::cpu::Cpu;

/// EI takes effect after the instruction that follows it.
pub(crate) const EI_DELAY: u8 = 2;

impl Cpu {
    /// Park on the HALT byte until an interrupt is pending.
    pub(crate) fn halt(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_sub(1);
        self.halted = true;
    }

    /// STOP is encoded as two bytes; the second one is skipped unread.
    pub(crate) fn stop(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.stopped = true;
        debug!(pc = self.regs.pc, "cpu stopped until joypad input");
    }

    pub(crate) fn di(&mut self) {
        self.ime = false;
        self.ime_delay = 0;
    }

    pub(crate) fn ei(&mut self) {
        if !self.ime {
            self.ime_delay = EI_DELAY;
        }
    }
}

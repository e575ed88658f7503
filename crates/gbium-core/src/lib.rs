use std::{fmt::Debug, path::Path};

use tracing::{debug, info};

use crate::{
    cartridge::Cartridge,
    config::Config,
    cpu::Cpu,
    error::Error,
    joypad::JoypadState,
    memory::{Memory, MemoryView, Permission},
};

pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod error;
pub mod joypad;
pub mod mem_block;
pub mod memory;
pub mod state;

pub use cpu::CpuSnapshot;

/// A clocked device that shares the memory space with the CPU.
///
/// Each machine cycle the driver hands the component a [`MemoryView`] carrying
/// the permission of the slot it is attached to.
pub trait Component: Debug {
    fn emulate_cycle(&mut self, memory: &mut MemoryView<'_>) -> Result<(), Error>;
}

/// Attachment points for components, listed in the order they are clocked
/// after the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Dma,
    Ppu,
    Counters,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Dma, Slot::Ppu, Slot::Counters];

    pub const fn permission(self) -> Permission {
        match self {
            Slot::Dma => Permission::Dma,
            Slot::Ppu => Permission::Ppu,
            Slot::Counters => Permission::Counter,
        }
    }

    const fn index(self) -> usize {
        match self {
            Slot::Dma => 0,
            Slot::Ppu => 1,
            Slot::Counters => 2,
        }
    }
}

/// Why [`Gameboy::run_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The CPU reached the requested address at an instruction boundary.
    Breakpoint { cycles: u64 },
    /// The cycle budget ran out first.
    CycleLimit,
}

#[derive(Debug)]
pub struct Gameboy {
    pub cpu: Cpu,
    memory: Memory,
    cartridge: Option<Cartridge>,
    config: Config,
    components: [Option<Box<dyn Component>>; 3],
    /// Raw ticks accumulated towards the next machine cycle.
    ticks: u32,
    /// Machine cycles executed since power-on.
    cycles: u64,
}

impl Gameboy {
    /// Powers on with an empty ROM-only memory space.
    pub fn new(config: Config) -> Self {
        Self::with_memory(config, Memory::default())
    }

    /// Powers on over an already populated memory space.
    pub fn with_memory(config: Config, memory: Memory) -> Self {
        Self {
            cpu: Cpu::with_registers(config.power_on.registers()),
            memory,
            cartridge: None,
            config,
            components: [None, None, None],
            ticks: 0,
            cycles: 0,
        }
    }

    /// Parses and maps a cartridge image, then powers on.
    pub fn from_rom(bytes: &[u8], config: Config) -> Result<Self, Error> {
        let (cartridge, memory) = cartridge::load_cartridge(bytes)?;
        info!(title = %cartridge.header().title, kind = %cartridge.kind(), "rom loaded");
        let mut gameboy = Self::with_memory(config, memory);
        gameboy.cartridge = Some(cartridge);
        Ok(gameboy)
    }

    pub fn load_rom_from_file<P>(path: P, config: Config) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let bytes = std::fs::read(path)?;
        Self::from_rom(&bytes, config)
    }

    /// Plugs `component` into `slot`, returning whatever was there before.
    pub fn attach(
        &mut self,
        slot: Slot,
        component: Box<dyn Component>,
    ) -> Option<Box<dyn Component>> {
        debug!(?slot, ?component, "component attached");
        self.components[slot.index()].replace(component)
    }

    pub fn detach(&mut self, slot: Slot) -> Option<Box<dyn Component>> {
        self.components[slot.index()].take()
    }

    /// Runs one machine cycle: the CPU first, then each attached component in
    /// [`Slot::ALL`] order, each through its own permissioned view.
    pub fn step_cycle(&mut self) -> Result<(), Error> {
        self.cpu.clock(&mut self.memory.view(Permission::Cpu))?;
        for slot in Slot::ALL {
            if let Some(component) = self.components[slot.index()].as_mut() {
                component.emulate_cycle(&mut self.memory.view(slot.permission()))?;
            }
        }
        self.cycles += 1;
        Ok(())
    }

    /// Feeds one raw oscillator tick. Returns `true` when it completed a
    /// machine cycle.
    pub fn tick(&mut self) -> Result<bool, Error> {
        self.ticks += 1;
        if self.ticks < self.config.ticks_per_cycle.max(1) {
            return Ok(false);
        }
        self.ticks = 0;
        self.step_cycle()?;
        Ok(true)
    }

    /// Runs cycles until the CPU is back at an instruction boundary. Returns
    /// the number of machine cycles spent.
    pub fn step_instruction(&mut self) -> Result<u32, Error> {
        let mut spent = 0;
        loop {
            self.step_cycle()?;
            spent += 1;
            if self.cpu.at_instruction_boundary() {
                return Ok(spent);
            }
        }
    }

    /// Runs until the next opcode fetch would happen at `pc`, or until
    /// `max_cycles` machine cycles have elapsed.
    pub fn run_until(&mut self, pc: u16, max_cycles: u64) -> Result<RunOutcome, Error> {
        for spent in 1..=max_cycles {
            self.step_cycle()?;
            if self.cpu.at_instruction_boundary() && self.cpu.pc() == pc {
                debug!(pc, cycles = spent, "breakpoint reached");
                return Ok(RunOutcome::Breakpoint { cycles: spent });
            }
        }
        Ok(RunOutcome::CycleLimit)
    }

    /// Mapped read with no lock checks, for debuggers and front-ends.
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory.peek(addr)
    }

    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        self.cpu.snapshot()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn set_joypad(&mut self, state: JoypadState) {
        self.memory.set_joypad(state);
    }

    /// Battery RAM image, if the cartridge has a battery.
    pub fn save_ram(&self) -> Option<Vec<u8>> {
        self.cartridge
            .as_ref()
            .filter(|cartridge| cartridge.has_battery())
            .map(|cartridge| cartridge.save_ram(&self.memory))
    }

    /// Restores a battery RAM image. Without a cartridge this is a no-op.
    pub fn restore_ram(&mut self, data: &[u8]) -> Result<(), Error> {
        match self.cartridge.as_ref() {
            Some(cartridge) => cartridge.restore_ram(&mut self.memory, data),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use ctor::ctor;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use super::*;
    use crate::cpu::interrupt::Interrupt;

    pub(crate) const TEST_COUNT: usize = 1000;

    #[ctor]
    fn init_tracing() {
        let subscriber = FmtSubscriber::builder()
            .with_file(true)
            .with_line_number(true)
            .with_max_level(Level::DEBUG)
            .pretty()
            .finish();
        tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
    }

    /// Records the order and permission of every call into a shared log.
    #[derive(Debug)]
    struct Probe {
        log: Rc<RefCell<Vec<Permission>>>,
    }

    impl Component for Probe {
        fn emulate_cycle(&mut self, memory: &mut MemoryView<'_>) -> Result<(), Error> {
            self.log.borrow_mut().push(memory.permission());
            Ok(())
        }
    }

    /// Requests a timer interrupt after a fixed number of cycles.
    #[derive(Debug)]
    struct Alarm {
        remaining: u32,
    }

    impl Component for Alarm {
        fn emulate_cycle(&mut self, memory: &mut MemoryView<'_>) -> Result<(), Error> {
            if self.remaining > 0 {
                self.remaining -= 1;
                if self.remaining == 0 {
                    memory.request_interrupt(Interrupt::TIMER);
                }
            }
            Ok(())
        }
    }

    fn nop_machine() -> Gameboy {
        Gameboy::new(Config::default())
    }

    #[test]
    fn components_run_in_slot_order_with_their_permission() {
        let mut gb = nop_machine();
        let log = Rc::new(RefCell::new(Vec::new()));
        for slot in [Slot::Counters, Slot::Dma, Slot::Ppu] {
            gb.attach(slot, Box::new(Probe { log: log.clone() }));
        }
        gb.step_cycle().expect("nop");
        assert_eq!(
            *log.borrow(),
            vec![Permission::Dma, Permission::Ppu, Permission::Counter]
        );

        assert!(gb.detach(Slot::Ppu).is_some());
        gb.step_cycle().expect("nop");
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn ticks_are_divided_into_cycles() {
        let mut gb = nop_machine();
        let completed = (0..TEST_COUNT)
            .map(|_| gb.tick().expect("nop"))
            .filter(|&done| done)
            .count();
        assert_eq!(completed, TEST_COUNT / 4);
        assert_eq!(gb.cycles(), (TEST_COUNT / 4) as u64);
    }

    #[test]
    fn zero_tick_ratio_steps_every_tick() {
        let mut gb = Gameboy::new(Config {
            ticks_per_cycle: 0,
            ..Config::default()
        });
        assert!(gb.tick().expect("nop"));
        assert!(gb.tick().expect("nop"));
        assert_eq!(gb.cycles(), 2);
    }

    #[test]
    fn run_until_stops_at_breakpoint() {
        let mut gb = nop_machine();
        // NOP ; LD A,0x05 ; JP 0x0100
        gb.memory_mut()
            .dump(0x0100, &[0x00, 0x3E, 0x05, 0xC3, 0x00, 0x01]);
        assert_eq!(
            gb.run_until(0x0103, 100).expect("runs"),
            RunOutcome::Breakpoint { cycles: 3 }
        );
        assert_eq!(gb.cpu.registers().a, 0x05);
        assert_eq!(gb.run_until(0x0100, 3).expect("runs"), RunOutcome::CycleLimit);
        assert_eq!(
            gb.run_until(0x0100, 1).expect("runs"),
            RunOutcome::Breakpoint { cycles: 1 }
        );
    }

    #[test]
    fn component_interrupt_is_serviced() {
        let mut gb = nop_machine();
        // EI ; then NOPs
        gb.memory_mut().dump(0x0100, &[0xFB]);
        gb.memory_mut()
            .dump(memory::map::io::IE, &[Interrupt::TIMER.bits()]);
        gb.attach(Slot::Counters, Box::new(Alarm { remaining: 8 }));

        let outcome = gb.run_until(Interrupt::TIMER.vector(), 64).expect("runs");
        assert!(matches!(outcome, RunOutcome::Breakpoint { .. }));
        assert_eq!(gb.peek(memory::map::io::IF) & Interrupt::TIMER.bits(), 0);
        assert!(!gb.snapshot().ime);
    }

    #[test]
    fn step_instruction_counts_cycles() {
        let mut gb = nop_machine();
        // LD BC,0x1234 ; CALL 0x0200
        gb.memory_mut()
            .dump(0x0100, &[0x01, 0x34, 0x12, 0xCD, 0x00, 0x02]);
        assert_eq!(gb.step_instruction().expect("ld"), 3);
        assert_eq!(gb.step_instruction().expect("call"), 6);
        assert_eq!(gb.pc(), 0x0200);
    }

    #[test]
    fn illegal_opcode_surfaces_from_driver() {
        let mut gb = nop_machine();
        gb.memory_mut().dump(0x0100, &[0xD3]);
        assert!(matches!(
            gb.step_cycle(),
            Err(Error::IllegalOpcode {
                opcode: 0xD3,
                pc: 0x0100
            })
        ));
        assert!(gb.step_cycle().is_err());
        assert!(gb.snapshot().jammed);
    }

    #[test]
    fn save_ram_needs_battery() {
        assert!(nop_machine().save_ram().is_none());
    }
}

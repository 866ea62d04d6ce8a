//! Recording mock hardware for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::device::{GainStage, PhyHandle, RadioHandle, TableId, GAIN_STAGE_ENTRIES};

/// A primitive call seen by a mock
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    Enter,
    Exit,
    CarrierSearch(bool),
    Read(u16),
    Write(u16, u16),
    Modify(u16, u16, u16),
    Table {
        table: TableId,
        offset: u32,
        width: u32,
        data: Vec<u8>,
    },
    RxGainStage {
        stage: GainStage,
        gains: [i8; GAIN_STAGE_ENTRIES],
        gain_bits: [u8; GAIN_STAGE_ENTRIES],
    },
    ScanSuppress(bool),
    Mpc(bool),
    Chanspec(u16),
    ReadShm(u32),
    WriteShm(u32, u16),
    ReadObjmem(u32),
}

impl Op {
    /// Register addressed by a register op.
    pub fn register(&self) -> Option<u16> {
        match *self {
            Op::Read(address) | Op::Write(address, _) | Op::Modify(address, _, _) => Some(address),
            _ => None,
        }
    }

    fn is_register_write(&self) -> bool {
        matches!(self, Op::Write(..) | Op::Modify(..))
    }
}

fn apply_mask(registers: &mut HashMap<u16, u16>, address: u16, mask: u16, value: u16) {
    let old = registers.get(&address).copied().unwrap_or(0);
    registers.insert(address, (old & !mask) | (value & mask));
}

#[derive(Debug, Default)]
pub struct MockPhy {
    pub ops: Vec<Op>,
    pub registers: HashMap<u16, u16>,
    held: usize,
}

impl MockPhy {
    /// Register writes and modifies, in order.
    pub fn register_ops(&self) -> Vec<Op> {
        self.ops
            .iter()
            .filter(|op| op.is_register_write())
            .cloned()
            .collect()
    }

    /// Whether every enter was matched by an exit.
    pub fn is_released(&self) -> bool {
        self.held == 0
    }

    /// Asserts every register or table op ran between an enter and an exit.
    pub fn assert_bracketed(&self) {
        let mut held = false;
        for op in &self.ops {
            match op {
                Op::Enter => {
                    assert!(!held, "nested register access");
                    held = true;
                }
                Op::Exit => {
                    assert!(held, "exit without enter");
                    held = false;
                }
                _ => assert!(held, "{op:?} outside of register access"),
            }
        }
        assert!(!held, "register access not released");
    }
}

impl PhyHandle for MockPhy {
    fn enter(&mut self) {
        self.held += 1;
        self.ops.push(Op::Enter);
    }

    fn exit(&mut self) {
        self.held -= 1;
        self.ops.push(Op::Exit);
    }

    fn stay_in_carrier_search(&mut self, enable: bool) {
        self.ops.push(Op::CarrierSearch(enable));
    }

    fn read_register(&mut self, address: u16) -> u16 {
        self.ops.push(Op::Read(address));
        self.registers.get(&address).copied().unwrap_or(0)
    }

    fn write_register(&mut self, address: u16, value: u16) {
        self.ops.push(Op::Write(address, value));
        self.registers.insert(address, value);
    }

    fn modify_register(&mut self, address: u16, mask: u16, value: u16) {
        self.ops.push(Op::Modify(address, mask, value));
        apply_mask(&mut self.registers, address, mask, value);
    }

    fn write_table(&mut self, table: TableId, offset: u32, width: u32, data: &[u8]) {
        self.ops.push(Op::Table {
            table,
            offset,
            width,
            data: data.to_vec(),
        });
    }

    fn set_rx_gain_stage(
        &mut self,
        stage: GainStage,
        gains: &[i8; GAIN_STAGE_ENTRIES],
        gain_bits: &[u8; GAIN_STAGE_ENTRIES],
    ) {
        self.ops.push(Op::RxGainStage {
            stage,
            gains: *gains,
            gain_bits: *gain_bits,
        });
    }
}

#[derive(Debug, Default)]
pub struct MockRadio {
    pub up: bool,
    pub ops: Vec<Op>,
    pub shm: HashMap<u32, u16>,
    pub objmem: HashMap<u32, u32>,
}

impl MockRadio {
    pub fn up() -> Self {
        Self {
            up: true,
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self::default()
    }

    /// Shared memory writes as (byte offset, value), in order.
    pub fn shm_writes(&self) -> Vec<(u32, u16)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::WriteShm(offset, value) => Some((offset, value)),
                _ => None,
            })
            .collect()
    }
}

impl RadioHandle for MockRadio {
    fn is_up(&self) -> bool {
        self.up
    }

    fn set_scan_suppress(&mut self, suppress: bool) {
        self.ops.push(Op::ScanSuppress(suppress));
    }

    fn set_mpc(&mut self, enabled: bool) {
        self.ops.push(Op::Mpc(enabled));
    }

    fn set_chanspec(&mut self, chanspec: u16) {
        self.ops.push(Op::Chanspec(chanspec));
    }

    fn read_shm(&mut self, byte_offset: u32) -> u16 {
        self.ops.push(Op::ReadShm(byte_offset));
        self.shm.get(&byte_offset).copied().unwrap_or(0)
    }

    fn write_shm(&mut self, byte_offset: u32, value: u16) {
        self.ops.push(Op::WriteShm(byte_offset, value));
        self.shm.insert(byte_offset, value);
    }

    fn read_objmem32(&mut self, word_address: u32) -> u32 {
        self.ops.push(Op::ReadObjmem(word_address));
        self.objmem.get(&word_address).copied().unwrap_or(0)
    }
}

/// PHY state shared by several execution contexts.
///
/// `enter` spins until the register lock is free, like the firmware's
/// register access on a multi-context build.
#[derive(Debug, Default)]
pub struct SharedPhy {
    lock: AtomicBool,
    registers: Mutex<HashMap<u16, u16>>,
    log: Mutex<Vec<(usize, Op)>>,
}

impl SharedPhy {
    pub fn context(self: &Arc<Self>, context: usize) -> ContextPhy {
        ContextPhy {
            context,
            shared: Arc::clone(self),
        }
    }

    pub fn log(&self) -> Vec<(usize, Op)> {
        self.log.lock().unwrap().clone()
    }

    /// Asserts no context ever ran an op while another one held the lock.
    pub fn assert_serialized(&self) {
        let mut owner = None;
        for (context, op) in self.log() {
            match op {
                Op::Enter => {
                    assert_eq!(owner, None, "context {context} entered while held");
                    owner = Some(context);
                }
                Op::Exit => {
                    assert_eq!(owner, Some(context));
                    owner = None;
                }
                op => assert_eq!(owner, Some(context), "{op:?} interleaved"),
            }
        }
        assert_eq!(owner, None);
    }
}

/// One context's view of a [`SharedPhy`]
pub struct ContextPhy {
    context: usize,
    shared: Arc<SharedPhy>,
}

impl ContextPhy {
    fn record(&self, op: Op) {
        self.shared.log.lock().unwrap().push((self.context, op));
    }
}

impl PhyHandle for ContextPhy {
    fn enter(&mut self) {
        while self
            .shared
            .lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::thread::yield_now();
        }
        self.record(Op::Enter);
    }

    fn exit(&mut self) {
        self.record(Op::Exit);
        self.shared.lock.store(false, Ordering::Release);
    }

    fn stay_in_carrier_search(&mut self, enable: bool) {
        self.record(Op::CarrierSearch(enable));
    }

    fn read_register(&mut self, address: u16) -> u16 {
        self.record(Op::Read(address));
        let registers = self.shared.registers.lock().unwrap();
        registers.get(&address).copied().unwrap_or(0)
    }

    fn write_register(&mut self, address: u16, value: u16) {
        self.record(Op::Write(address, value));
        self.shared.registers.lock().unwrap().insert(address, value);
    }

    fn modify_register(&mut self, address: u16, mask: u16, value: u16) {
        self.record(Op::Modify(address, mask, value));
        apply_mask(&mut self.shared.registers.lock().unwrap(), address, mask, value);
    }

    fn write_table(&mut self, table: TableId, offset: u32, width: u32, data: &[u8]) {
        self.record(Op::Table {
            table,
            offset,
            width,
            data: data.to_vec(),
        });
    }

    fn set_rx_gain_stage(
        &mut self,
        stage: GainStage,
        gains: &[i8; GAIN_STAGE_ENTRIES],
        gain_bits: &[u8; GAIN_STAGE_ENTRIES],
    ) {
        self.record(Op::RxGainStage {
            stage,
            gains: *gains,
            gain_bits: *gain_bits,
        });
    }
}

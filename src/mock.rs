//! native 边界的记录型替身
//! 假主机写来的字节排在队列里等 read 取走；从机写出的字节累积在日志里
//! transmit 内部空转一小段时间，让并发调用的交叠能被观察到

use crate::bus::BusId;
use crate::error::NativeInitError;
use crate::native::{NativeSlave, Timeout, Transfer};
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use spin::Mutex;

struct Shared {
    // 合法总线号为 0..bus_count
    bus_count: u8,
    master_out: Mutex<VecDeque<u8>>,
    written: Mutex<Vec<u8>>,
    last_timeout: Mutex<Option<Timeout>>,
    accept_writes: AtomicBool,
    init_calls: AtomicUsize,
    dispose_calls: AtomicUsize,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
}

/// 可克隆的替身：克隆体共享同一份记录，
/// 方便把一份交给句柄、另一份留在测试里观察
#[derive(Clone)]
pub struct MockSlave {
    shared: Arc<Shared>,
}

impl MockSlave {
    /// 构造一个有 `bus_count` 个控制器的替身
    pub fn new(bus_count: u8) -> MockSlave {
        MockSlave {
            shared: Arc::new(Shared {
                bus_count,
                master_out: Mutex::new(VecDeque::new()),
                written: Mutex::new(Vec::new()),
                last_timeout: Mutex::new(None),
                accept_writes: AtomicBool::new(true),
                init_calls: AtomicUsize::new(0),
                dispose_calls: AtomicUsize::new(0),
                in_flight: AtomicBool::new(false),
                overlapped: AtomicBool::new(false),
            }),
        }
    }

    /// 模拟主机对从机的一次写入
    pub fn master_sends(&self, bytes: &[u8]) {
        let mut pending = self.shared.master_out.lock();
        for b in bytes {
            pending.push_back(*b);
        }
    }

    /// 从机至今写出的全部字节
    pub fn written(&self) -> Vec<u8> {
        self.shared.written.lock().clone()
    }

    /// 设为 false 后写传输一个字节也不接受
    pub fn set_accept_writes(&self, accept: bool) {
        self.shared.accept_writes.store(accept, Ordering::SeqCst);
    }

    pub fn init_calls(&self) -> usize {
        self.shared.init_calls.load(Ordering::SeqCst)
    }

    pub fn dispose_calls(&self) -> usize {
        self.shared.dispose_calls.load(Ordering::SeqCst)
    }

    pub fn last_timeout(&self) -> Option<Timeout> {
        *self.shared.last_timeout.lock()
    }

    /// 是否出现过两次传输同时进行
    pub fn saw_overlap(&self) -> bool {
        self.shared.overlapped.load(Ordering::SeqCst)
    }
}

impl NativeSlave for MockSlave {
    fn init(&self, bus: BusId, _address: u16) -> Result<(), NativeInitError> {
        self.shared.init_calls.fetch_add(1, Ordering::SeqCst);
        if bus.0 >= self.shared.bus_count {
            return Err(NativeInitError::InvalidBus);
        }
        Ok(())
    }

    fn dispose(&self, _bus: BusId) {
        self.shared.dispose_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn transmit(&self, xfer: Transfer<'_>, timeout: Timeout) -> usize {
        if self.shared.in_flight.swap(true, Ordering::SeqCst) {
            self.shared.overlapped.store(true, Ordering::SeqCst);
        }
        *self.shared.last_timeout.lock() = Some(timeout);

        // 拉开传输窗口，并发的调用者会撞进来
        for _ in 0..5_000 {
            core::hint::spin_loop();
        }

        let n = match xfer {
            Transfer::Read(buf) => {
                let mut pending = self.shared.master_out.lock();
                let mut n = 0;
                while n < buf.len() {
                    match pending.pop_front() {
                        Some(b) => {
                            buf[n] = b;
                            n += 1;
                        }
                        None => break,
                    }
                }
                n
            }
            Transfer::Write(buf) => {
                if self.shared.accept_writes.load(Ordering::SeqCst) {
                    self.shared.written.lock().extend_from_slice(buf);
                    buf.len()
                } else {
                    0
                }
            }
        };

        self.shared.in_flight.store(false, Ordering::SeqCst);
        n
    }
}

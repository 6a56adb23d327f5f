//! 从机设备句柄

use crate::bus::{self, BusId, Claim};
use crate::error::Error;
use crate::native::{NativeSlave, Timeout, Transfer};
use spin::Mutex;

struct State {
    // 单字节暂存，跨单字节操作复用，避免每次分配
    scratch: [u8; 1],
    closed: bool,
}

/// 某条总线上的一个 I2C 从机注册
///
/// 每个公开操作全程持有句柄锁，多个线程共享句柄时传输自然被串行化
/// （不妨碍硬件层面的总线竞争，那是 native 层的事情）
/// 句柄析构时恰好释放一次 native 注册与总线登记
pub struct I2cSlave<T: NativeSlave> {
    bus: BusId,
    address: u16,
    native: T,
    state: Mutex<State>,
}

impl<T: NativeSlave> I2cSlave<T> {
    /// 以 `address` 在 `bus` 上注册从机
    ///
    /// 总线已被占用（主机或其他从机）或 native 层拒绝注册时失败
    pub fn open(native: T, bus: BusId, address: u16) -> Result<I2cSlave<T>, Error> {
        bus::claim(bus, Claim::Slave { address })?;
        if let Err(e) = native.init(bus, address) {
            bus::release(bus);
            return Err(e.into());
        }
        debug!("i2c{}: slave 0x{:02x} registered", bus.0, address);

        Ok(I2cSlave {
            bus,
            address,
            native,
            state: Mutex::new(State {
                scratch: [0],
                closed: false,
            }),
        })
    }

    pub fn bus_id(&self) -> BusId {
        self.bus
    }

    pub fn device_address(&self) -> u16 {
        self.address
    }

    /// 接收主机写来的一个字节
    ///
    /// `Ok(None)` 表示超时前没有字节到达，属于正常结果而非错误
    pub fn read_byte(&self, timeout: Timeout) -> Result<Option<u8>, Error> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }

        let n = self
            .native
            .transmit(Transfer::Read(&mut state.scratch), timeout);
        if n == 1 {
            Ok(Some(state.scratch[0]))
        } else {
            Ok(None)
        }
    }

    /// 接收至多 `buf.len()` 个字节，返回实际到达的字节数
    /// 读不满不是错误，计数永远在 `0..=buf.len()` 内
    pub fn read(&self, buf: &mut [u8], timeout: Timeout) -> Result<usize, Error> {
        let state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }

        let n = self.native.transmit(Transfer::Read(buf), timeout);
        debug_assert!(n <= buf.len());
        Ok(n)
    }

    /// 准备一个字节给主机读走，返回是否被接受
    pub fn write_byte(&self, value: u8, timeout: Timeout) -> Result<bool, Error> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }

        state.scratch[0] = value;
        let n = self.native.transmit(Transfer::Write(&state.scratch), timeout);
        Ok(n == 1)
    }

    /// 准备一段字节给主机读走，返回实际被接受的字节数
    pub fn write(&self, buf: &[u8], timeout: Timeout) -> Result<usize, Error> {
        let state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }

        let n = self.native.transmit(Transfer::Write(buf), timeout);
        debug_assert!(n <= buf.len());
        Ok(n)
    }

    /// 释放 native 注册与总线登记，可重复调用
    ///
    /// 这里同样要拿句柄锁，保证关闭不会与进行中的传输交叠
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        self.native.dispose(self.bus);
        bus::release(self.bus);
        debug!("i2c{}: slave 0x{:02x} released", self.bus.0, self.address);
    }
}

impl<T: NativeSlave> core::fmt::Debug for I2cSlave<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("I2cSlave")
            .field("bus", &self.bus)
            .field("address", &self.address)
            .finish()
    }
}

impl<T: NativeSlave> Drop for I2cSlave<T> {
    fn drop(&mut self) {
        self.close();
    }
}

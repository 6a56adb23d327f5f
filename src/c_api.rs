//! 对接固件层的 native 入口
//! 从机协议引擎整个在固件里，本库只碰这三个符号

use crate::bus::BusId;
use crate::error::NativeInitError;
use crate::native::{NativeSlave, Timeout, Transfer};
use core::ptr;

const ERR_INVALID_BUS: i32 = -1;
const ERR_CLAIMED: i32 = -2;

extern "C" {
    /// 0 表示成功，负数为错误码
    fn i2c_slave_native_init(bus: u8, address: u16) -> i32;

    fn i2c_slave_native_dispose(bus: u8);

    /// read / write 恰好一个非空；返回搬运的字节数或负的错误码
    fn i2c_slave_native_transmit(
        read: *mut u8,
        write: *const u8,
        len: usize,
        timeout_ms: u32,
    ) -> i32;
}

/// 绑定到固件入口的 `NativeSlave` 实现
pub struct RuntimeSlave;

impl NativeSlave for RuntimeSlave {
    fn init(&self, bus: BusId, address: u16) -> Result<(), NativeInitError> {
        let rc = unsafe { i2c_slave_native_init(bus.0, address) };
        match rc {
            0 => Ok(()),
            ERR_INVALID_BUS => Err(NativeInitError::InvalidBus),
            ERR_CLAIMED => Err(NativeInitError::Claimed),
            _ => Err(NativeInitError::Failed),
        }
    }

    fn dispose(&self, bus: BusId) {
        unsafe { i2c_slave_native_dispose(bus.0) }
    }

    fn transmit(&self, xfer: Transfer<'_>, timeout: Timeout) -> usize {
        let rc = match xfer {
            Transfer::Read(buf) => unsafe {
                i2c_slave_native_transmit(
                    buf.as_mut_ptr(),
                    ptr::null(),
                    buf.len(),
                    timeout.as_millis(),
                )
            },
            Transfer::Write(buf) => unsafe {
                i2c_slave_native_transmit(
                    ptr::null_mut(),
                    buf.as_ptr(),
                    buf.len(),
                    timeout.as_millis(),
                )
            },
        };

        // 传输不足不算失败，负的错误码一律当作 0 字节
        if rc < 0 {
            0
        } else {
            rc as usize
        }
    }
}

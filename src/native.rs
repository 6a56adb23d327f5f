//! native 边界
//! 固件层只暴露三个入口：init / dispose / transmit
//! 这里用 trait 抽象，方便测试时注入替身

use crate::bus::BusId;
use crate::error::NativeInitError;

/// 一次从机传输的方向与缓冲
/// 每次调用恰好携带一个缓冲，对应 native 原语的 read/write 指针二选一
#[derive(Debug)]
pub enum Transfer<'a> {
    /// 接收主机写来的字节
    Read(&'a mut [u8]),
    /// 准备好给主机读走的字节
    Write(&'a [u8]),
}

impl<'a> Transfer<'a> {
    pub fn len(&self) -> usize {
        match self {
            Transfer::Read(buf) => buf.len(),
            Transfer::Write(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 传输允许阻塞的毫秒数
/// `u32::MAX` 表示一直等待，与 FreeRTOS 系 `portMAX_DELAY` 的习惯一致
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout(u32);

impl Timeout {
    pub const FOREVER: Timeout = Timeout(u32::MAX);

    pub const fn millis(ms: u32) -> Timeout {
        Timeout(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    pub const fn is_forever(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::FOREVER
    }
}

/// 固件层提供的三个入口
///
/// `transmit` 阻塞到传输完成或超时为止，返回实际搬运的字节数，
/// 不会超过缓冲长度；搬运不足是正常结果而不是失败
pub trait NativeSlave {
    fn init(&self, bus: BusId, address: u16) -> Result<(), NativeInitError>;

    /// 释放硬件注册，每个句柄至多调用一次
    fn dispose(&self, bus: BusId);

    fn transmit(&self, xfer: Transfer<'_>, timeout: Timeout) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_waits_forever() {
        assert_eq!(Timeout::default(), Timeout::FOREVER);
        assert!(Timeout::FOREVER.is_forever());
        assert!(!Timeout::millis(10).is_forever());
        assert_eq!(Timeout::millis(10).as_millis(), 10);
    }

    #[test]
    fn transfer_len_follows_buffer() {
        let mut rd = [0u8; 4];
        assert_eq!(Transfer::Read(&mut rd).len(), 4);
        assert_eq!(Transfer::Write(&[]).len(), 0);
        assert!(Transfer::Write(&[]).is_empty());
    }
}

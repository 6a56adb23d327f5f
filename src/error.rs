//! 错误定义
//! 只有配置错误与误用会以 Err 返回
//! 传输不足（超时、NACK、总线噪声）通过字节计数反映，由调用者决定是否重试

use core::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// 总线号没有对应的控制器
    InvalidBus,
    /// 总线已被占用（主机模式或其他从机句柄）
    BusInUse,
    /// native 层拒绝了从机注册
    InitFailed,
    /// 句柄已关闭，不能再发起传输
    Closed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBus => f.write_str("bus id names no configured controller"),
            Error::BusInUse => f.write_str("bus already claimed"),
            Error::InitFailed => f.write_str("native slave registration failed"),
            Error::Closed => f.write_str("handle already closed"),
        }
    }
}

/// native init 入口的失败原因
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NativeInitError {
    InvalidBus,
    Claimed,
    Failed,
}

impl From<NativeInitError> for Error {
    fn from(e: NativeInitError) -> Self {
        match e {
            NativeInitError::InvalidBus => Error::InvalidBus,
            NativeInitError::Claimed => Error::BusInUse,
            NativeInitError::Failed => Error::InitFailed,
        }
    }
}

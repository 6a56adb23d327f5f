#![cfg_attr(not(test), no_std)]

//! I2C 从机设备句柄
//! 总线仲裁、时钟同步、地址匹配、中断搬运等都由 native 固件层完成
//! 本库只负责：串行化对 native 传输原语的并发访问、登记总线占用、
//! 在句柄销毁时恰好释放一次 native 资源

pub(crate) extern crate alloc;

mod fmt;

pub mod bus;
pub mod error;
pub mod native;
pub mod slave;

#[cfg(feature = "native")]
pub mod c_api;
#[cfg(feature = "mock")]
pub mod mock;

/* 导出的类型 */
pub use bus::{claim_master, BusId, BusMaster};
pub use error::{Error, NativeInitError};
pub use native::{NativeSlave, Timeout, Transfer};
pub use slave::I2cSlave;

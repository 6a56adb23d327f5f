//! 总线占用登记
//! 每个控制器同一时刻只允许一个占用：主机驱动或单个从机注册
//! 登记表不知道硬件上到底有哪些总线号，合法性由 native init 判定

use crate::error::Error;
use alloc::collections::BTreeMap;
use core::fmt;
use lazy_static::lazy_static;
use spin::Mutex;

/// 芯片上一个 I2C 控制器的编号
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusId(pub u8);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i2c{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Claim {
    Master,
    Slave { address: u16 },
}

lazy_static! {
    static ref BUS_CLAIMS: Mutex<BTreeMap<u8, Claim>> = Mutex::new(BTreeMap::new());
}

pub(crate) fn claim(bus: BusId, c: Claim) -> Result<(), Error> {
    let mut claims = BUS_CLAIMS.lock();

    return if let None = claims.get(&bus.0) {
        claims.insert(bus.0, c);
        Ok(())
    } else {
        Err(Error::BusInUse)
    };
}

pub(crate) fn release(bus: BusId) {
    let mut claims = BUS_CLAIMS.lock();
    claims.remove(&bus.0);
}

/// 把 `bus` 登记为主机模式，阻止在其上打开从机句柄
/// 守卫析构时解除登记
pub fn claim_master(bus: BusId) -> Result<BusMaster, Error> {
    claim(bus, Claim::Master)?;
    trace!("i2c{} claimed as master", bus.0);
    Ok(BusMaster { bus })
}

pub struct BusMaster {
    bus: BusId,
}

impl BusMaster {
    pub fn bus_id(&self) -> BusId {
        self.bus
    }
}

impl Drop for BusMaster {
    fn drop(&mut self) {
        release(self.bus);
        trace!("i2c{} master claim released", self.bus.0);
    }
}

//! 多线程共享一个句柄时的行为：传输必须被句柄锁完全串行化

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use i2c_slave_dev::mock::MockSlave;
use i2c_slave_dev::{BusId, Error, I2cSlave, Timeout};

#[test]
fn concurrent_read_and_write_never_overlap() {
    let mock = MockSlave::new(255);
    mock.master_sends(&[0u8; 4096]);
    let dev = Arc::new(I2cSlave::open(mock.clone(), BusId(0), 0x42).unwrap());

    let reader = {
        let dev = dev.clone();
        thread::spawn(move || {
            let mut buf = [0u8; 16];
            for _ in 0..200 {
                dev.read(&mut buf, Timeout::millis(1)).unwrap();
            }
        })
    };
    let writer = {
        let dev = dev.clone();
        thread::spawn(move || {
            for i in 0..200u32 {
                dev.write(&[i as u8; 16], Timeout::millis(1)).unwrap();
            }
        })
    };

    reader.join().unwrap();
    writer.join().unwrap();
    assert!(!mock.saw_overlap());
}

#[test]
fn scratch_buffer_is_never_shared_between_threads() {
    let mock = MockSlave::new(255);
    let dev = Arc::new(I2cSlave::open(mock.clone(), BusId(1), 0x42).unwrap());

    let workers: Vec<_> = [0xaau8, 0x55u8]
        .iter()
        .map(|&value| {
            let dev = dev.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(dev.write_byte(value, Timeout::millis(1)), Ok(true));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    let written = mock.written();
    assert_eq!(written.len(), 200);
    // 暂存字节从不串台：写出的只能是两个线程各自的值
    assert!(written.iter().all(|&b| b == 0xaa || b == 0x55));
    assert_eq!(written.iter().filter(|&&b| b == 0xaa).count(), 100);
    assert!(!mock.saw_overlap());
}

#[test]
fn close_during_traffic_is_safe() {
    let mock = MockSlave::new(255);
    mock.master_sends(&[0u8; 1024]);
    let dev = Arc::new(I2cSlave::open(mock.clone(), BusId(2), 0x42).unwrap());

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let dev = dev.clone();
            thread::spawn(move || loop {
                let mut buf = [0u8; 8];
                match dev.read(&mut buf, Timeout::millis(1)) {
                    Ok(_) => {}
                    Err(Error::Closed) => break,
                    Err(e) => panic!("unexpected error: {:?}", e),
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    dev.close();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(mock.dispose_calls(), 1);
    assert!(!mock.saw_overlap());
}

use std::time::Instant;

/// 时间源抽象，缓存和限流都通过它取当前时间，测试时可注入假时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// 默认时钟，直接读系统单调时间
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 测试用的手动时钟，只能向前拨
#[cfg(test)]
pub struct ManualClock {
    now: parking_lot::Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: parking_lot::Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, delta: std::time::Duration) {
        *self.now.lock() += delta;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

//! Double-buffer role tracking for the feedback passes.
//!
//! Each frame reads the settled slot and renders into the other, then
//! `swap()` flips the roles. Holding both slots in one value keeps a pass
//! from sampling the target it is writing.

/// Two equally-sized buffers used alternately as read and write.
///
/// `read()` holds the latest settled frame; `write()` holds data from two
/// passes ago and may be overwritten freely. The two are never the same slot.
#[derive(Debug)]
pub struct PingPong<T> {
    a: T,
    b: T,
    a_is_read: bool,
}

/// Which slot currently plays which role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl<T> PingPong<T> {
    pub fn new(a: T, b: T) -> Self {
        Self {
            a,
            b,
            a_is_read: true,
        }
    }

    pub fn from_fn(mut make: impl FnMut(Slot) -> T) -> Self {
        Self::new(make(Slot::A), make(Slot::B))
    }

    #[inline]
    pub fn read(&self) -> &T {
        if self.a_is_read {
            &self.a
        } else {
            &self.b
        }
    }

    #[inline]
    pub fn write(&self) -> &T {
        if self.a_is_read {
            &self.b
        } else {
            &self.a
        }
    }

    #[inline]
    pub fn write_mut(&mut self) -> &mut T {
        if self.a_is_read {
            &mut self.b
        } else {
            &mut self.a
        }
    }

    #[inline]
    pub fn read_slot(&self) -> Slot {
        if self.a_is_read {
            Slot::A
        } else {
            Slot::B
        }
    }

    #[inline]
    pub fn write_slot(&self) -> Slot {
        match self.read_slot() {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    /// Exchange roles: the buffer just written becomes readable.
    #[inline]
    pub fn swap(&mut self) {
        self.a_is_read = !self.a_is_read;
    }

    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    /// Rebuild both buffers in place (e.g. on resize), keeping roles.
    pub fn rebuild(&mut self, mut make: impl FnMut(Slot) -> T) {
        self.a = make(Slot::A);
        self.b = make(Slot::B);
    }

    pub fn into_inner(self) -> (T, T) {
        (self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_write_are_distinct() {
        let mut pp = PingPong::new("a", "b");
        for _ in 0..5 {
            assert_ne!(pp.read_slot(), pp.write_slot());
            assert_ne!(pp.read(), pp.write());
            pp.swap();
        }
    }

    #[test]
    fn swap_promotes_write_to_read() {
        let mut pp = PingPong::from_fn(|_| 0_u32);
        *pp.write_mut() = 7;
        let written = pp.write_slot();
        pp.swap();
        assert_eq!(pp.read_slot(), written);
        assert_eq!(*pp.read(), 7);
    }

    #[test]
    fn rebuild_keeps_roles() {
        let mut pp = PingPong::new(1, 2);
        pp.swap();
        let read = pp.read_slot();
        pp.rebuild(|s| if s == Slot::A { 10 } else { 20 });
        assert_eq!(pp.read_slot(), read);
        assert_eq!(*pp.read(), 20);
    }
}

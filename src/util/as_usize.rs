use cfg_if::cfg_if;

pub trait AsUsize: Copy + PartialEq + PartialOrd {
    /// Convert number into usize, panic if out of range
    fn as_usize(self) -> usize;
}

impl AsUsize for u16 {
    #[inline(always)]
    fn as_usize(self) -> usize {
        self.into()
    }
}

impl AsUsize for u32 {
    #[inline(always)]
    fn as_usize(self) -> usize {
        cfg_if! {
            if #[cfg(target_pointer_width = "16")] {
                self.try_into()
                    .unwrap_or_else(|_| panic!("unable to convert {self}u32 into usize"))
            } else {
                self as usize
            }
        }
    }
}

impl AsUsize for i32 {
    /// Negative values are a bug at the call site.
    #[inline(always)]
    fn as_usize(self) -> usize {
        self.try_into()
            .unwrap_or_else(|_| panic!("unable to convert {self}i32 into usize"))
    }
}

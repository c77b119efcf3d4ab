use std::marker::PhantomData;

/// Marker for types bound to the thread that created them (OS handles, for instance).
#[derive(Debug, Default, Clone)]
pub struct NonSend(PhantomData<*const ()>);

impl NonSend {
    pub fn new() -> Self {
        Default::default()
    }
}

/// Receives events from a descent run and decides how it should proceed.
///
/// Observers let callers monitor or steer a run without changing the solver
/// API: recording trajectories, logging progress, or stopping early.
///
/// The `observe` method returns `Option<A>`, where `Some(action)` requests a
/// solver-specific action and `None` lets the run continue unchanged.
///
/// Closures automatically implement `Observer`, and `()` is a no-op observer.
pub trait Observer<E, A> {
    /// Observes an event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Halt,
    }

    fn drive<O: Observer<usize, Action>>(mut observer: O, events: usize) -> Option<usize> {
        (0..events).find(|event| observer.observe(event).is_some())
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_observer_can_act() {
        let observer = |event: &usize| (*event == 3).then_some(Action::Halt);
        assert_eq!(drive(observer, 10), Some(3));
    }

    #[test]
    fn borrowed_observer_keeps_state() {
        let mut seen = Vec::new();
        let mut observer = |event: &usize| {
            seen.push(*event);
            None::<Action>
        };
        drive(&mut observer, 3);
        assert_eq!(seen, vec![0, 1, 2]);
    }
}

use crate::{Effect, FailureCause, FetchState, Msg, ScanResult};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every listener handed in through `Request`/`Refresh` comes back out in
/// exactly one `Notify*` effect, either immediately or from the completion
/// that ends its cycle.
pub fn update<L>(mut state: FetchState<L>, msg: Msg<L>) -> (FetchState<L>, Vec<Effect<L>>) {
    let effects = match msg {
        Msg::Request(listener) => match state.cached_value() {
            Some(value) => {
                let value = value.to_owned();
                vec![Effect::NotifySuccess { listener, value }]
            }
            None => begin_cycle(&mut state, listener),
        },
        Msg::Refresh(listener) => begin_cycle(&mut state, listener),
        Msg::ResponseScanned(ScanResult::Found(value)) => {
            state.latch(value.clone());
            match state.take_pending() {
                Some(listener) => vec![Effect::NotifySuccess { listener, value }],
                None => Vec::new(),
            }
        }
        Msg::ResponseScanned(ScanResult::NotFound) => fail_cycle(&mut state, FailureCause::NotFound),
        Msg::ResponseScanned(ScanResult::MalformedInput) => {
            fail_cycle(&mut state, FailureCause::MalformedInput)
        }
        Msg::TransportFailed => fail_cycle(&mut state, FailureCause::Transport),
    };

    (state, effects)
}

fn begin_cycle<L>(state: &mut FetchState<L>, listener: L) -> Vec<Effect<L>> {
    // One request in flight at a time; a second caller is turned away
    // rather than replacing the first.
    if state.has_pending() {
        return vec![Effect::NotifyFailure {
            listener,
            cause: FailureCause::Busy,
        }];
    }
    state.set_pending(listener);
    vec![Effect::SendQuery]
}

fn fail_cycle<L>(state: &mut FetchState<L>, cause: FailureCause) -> Vec<Effect<L>> {
    state.invalidate(cause);
    match state.take_pending() {
        Some(listener) => vec![Effect::NotifyFailure { listener, cause }],
        None => Vec::new(),
    }
}

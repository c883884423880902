use reservation_sdk::{ErrorKind, Operation, ReservationTransport, TransportError};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct Script {
    failures: BTreeMap<Operation, VecDeque<TransportError>>,
    delays: BTreeMap<Operation, Duration>,
    attempts: BTreeMap<Operation, u32>,
}

/// Wraps a transport and fails queued attempts before reaching it.
///
/// Every call counts as an attempt. A configured delay is applied first
/// (a real sleep for blocking calls, a tokio sleep for async ones), then the
/// next scripted error for that operation is returned if one is queued.
#[derive(Debug)]
pub struct ScriptedFailures<T> {
    inner: T,
    script: Mutex<Script>,
}

impl<T> ScriptedFailures<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, script: Mutex::new(Script::default()) }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn fail_next(self, operation: Operation, err: TransportError) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.failures.entry(operation).or_default().push_back(err);
        }
        self
    }

    pub fn fail_times(mut self, operation: Operation, times: usize, kind: ErrorKind) -> Self {
        for attempt in 1..=times {
            self = self.fail_next(
                operation,
                TransportError::remote(kind, format!("scripted {kind} #{attempt}")),
            );
        }
        self
    }

    pub fn with_delay(self, operation: Operation, delay: Duration) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.delays.insert(operation, delay);
        }
        self
    }

    pub fn attempts(&self, operation: Operation) -> u32 {
        self.script
            .lock()
            .map(|script| script.attempts.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn pending_failures(&self, operation: Operation) -> usize {
        self.script
            .lock()
            .map(|script| script.failures.get(&operation).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    fn begin(
        &self,
        operation: Operation,
    ) -> Result<(Option<Duration>, Option<TransportError>), TransportError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| TransportError::remote(ErrorKind::Internal, "failure script poisoned"))?;
        *script.attempts.entry(operation).or_default() += 1;
        let delay = script.delays.get(&operation).copied();
        let failure = script.failures.get_mut(&operation).and_then(VecDeque::pop_front);
        Ok((delay, failure))
    }
}

macro_rules! scripted_blocking {
    ($($method:ident => $operation:ident($request:ty) -> $response:ty;)*) => {
        impl<T: ReservationTransport> ReservationTransport for ScriptedFailures<T> {
            $(
                fn $method(&self, req: $request) -> Result<$response, TransportError> {
                    let (delay, failure) = self.begin(Operation::$operation)?;
                    if let Some(delay) = delay {
                        std::thread::sleep(delay);
                    }
                    match failure {
                        Some(err) => Err(err),
                        None => self.inner.$method(req),
                    }
                }
            )*
        }
    };
}

macro_rules! scripted_async {
    ($($method:ident => $operation:ident($request:ty) -> $response:ty;)*) => {
        #[async_trait::async_trait]
        impl<T> reservation_sdk::ReservationTransportAsync for ScriptedFailures<T>
        where
            T: reservation_sdk::ReservationTransportAsync,
        {
            $(
                async fn $method(&self, req: $request) -> Result<$response, TransportError> {
                    let (delay, failure) = self.begin(Operation::$operation)?;
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    match failure {
                        Some(err) => Err(err),
                        None => self.inner.$method(req).await,
                    }
                }
            )*
        }
    };
}

for_each_operation!(scripted_blocking);
for_each_operation!(scripted_async);

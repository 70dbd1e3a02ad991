use std::future::Future;
use std::time::Duration;

/// Fixed-interval retry-until-terminal driver for one asynchronous request.
///
/// Each attempt is awaited to completion before the next is scheduled, so a
/// poll instance never has more than one request outstanding. There is no
/// attempt cap and no cancellation: a status that never turns terminal is an
/// unbounded wait, and a started poll always runs to its end. Keeping results
/// from superseded polls from becoming visible is the caller's job.
#[derive(Copy, Clone, Debug)]
pub struct JobPoller {
    interval: Duration,
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Invoke `request` until `is_terminal` accepts its response, sleeping
    /// the interval between attempts, and return that terminal response.
    pub async fn run<Req, Fut, T, P>(&self, mut request: Req, mut is_terminal: P) -> T
    where
        Req: FnMut() -> Fut,
        Fut: Future<Output = T>,
        P: FnMut(&T) -> bool,
    {
        loop {
            let response = request().await;
            if is_terminal(&response) {
                return response;
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Fire-and-forget variant: run on the local task set and hand the
    /// terminal response to `on_complete` exactly once.
    pub fn spawn<Req, Fut, T, P, Done>(self, request: Req, is_terminal: P, on_complete: Done)
    where
        Req: FnMut() -> Fut + 'static,
        Fut: Future<Output = T>,
        T: 'static,
        P: FnMut(&T) -> bool + 'static,
        Done: FnOnce(T) + 'static,
    {
        tokio::task::spawn_local(async move {
            let response = self.run(request, is_terminal).await;
            on_complete(response);
        });
    }
}

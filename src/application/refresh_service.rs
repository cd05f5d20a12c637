// Refresh service - periodic polling that publishes dashboard updates
use crate::application::dashboard_service::DashboardService;
use crate::domain::dashboard::DashboardUpdate;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct RefreshService {
    dashboard_service: DashboardService,
    interval: Duration,
    channel_capacity: usize,
}

/// Stops the refresh loop. A cycle already in flight runs to completion
/// but its result is not published.
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Refresh task ended abnormally: {}", e);
        }
    }
}

impl RefreshService {
    pub fn new(dashboard_service: DashboardService, interval: Duration, channel_capacity: usize) -> Self {
        Self {
            dashboard_service,
            interval,
            channel_capacity,
        }
    }

    /// Starts the loop. Ticks refresh unconditionally until a first update
    /// has been published; after that only while the backend simulation is
    /// active. Updates go to a single consumer, in cycle order.
    pub fn spawn(self) -> (RefreshHandle, mpsc::Receiver<DashboardUpdate>) {
        let (tx, rx) = mpsc::channel(self.channel_capacity.max(1));
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(self.run(tx, stop_rx));

        (RefreshHandle { stop_tx, task }, rx)
    }

    async fn run(self, tx: mpsc::Sender<DashboardUpdate>, mut stop_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Set by the first published update; until then every tick retries
        let mut loaded = false;
        let mut published: u64 = 0;

        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            if loaded && !self.simulation_active().await {
                continue;
            }
            let cycle = self.dashboard_service.next_cycle();

            let update = match self.dashboard_service.refresh(cycle).await {
                Ok(update) => update,
                Err(e) => {
                    tracing::warn!("Refresh cycle {} failed: {:#}", cycle, e);
                    continue;
                }
            };

            if *stop_rx.borrow() {
                tracing::debug!("Dropping cycle {} after stop", cycle);
                break;
            }
            tokio::select! {
                sent = tx.send(update) => {
                    if sent.is_err() {
                        tracing::debug!("Dashboard consumer closed, stopping refresh");
                        break;
                    }
                }
                _ = stop_rx.changed() => {
                    tracing::debug!("Dropping cycle {} after stop", cycle);
                    break;
                }
            }
            loaded = true;
            published += 1;
        }

        tracing::info!("Refresh loop stopped after {} published cycles", published);
    }

    async fn simulation_active(&self) -> bool {
        match self.dashboard_service.repository().simulation_status().await {
            Ok(status) => status.active,
            Err(e) => {
                tracing::warn!("Simulation status unavailable: {:#}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::{service, FakeRepository};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_without_simulation() {
        let repository = Arc::new(FakeRepository::with_flow(vec![1.0, 2.0, 3.0]));
        let refresh = RefreshService::new(service(repository.clone()), Duration::from_secs(5), 4);
        let (handle, mut rx) = refresh.spawn();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.cycle, 1);

        // Simulation idle: further ticks do not fetch current data
        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(repository.current_calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());

        handle.stop();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_initial_load_is_retried() {
        let repository = Arc::new(FakeRepository::with_flow(vec![1.0, 2.0]));
        repository.fail_current.store(true, Ordering::SeqCst);
        let refresh = RefreshService::new(service(repository.clone()), Duration::from_secs(5), 4);
        let (handle, mut rx) = refresh.spawn();

        // Ticks at 0s, 5s and 10s all fail, simulation idle
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(repository.current_calls.load(Ordering::SeqCst), 3);
        assert!(rx.try_recv().is_err());

        repository.fail_current.store(false, Ordering::SeqCst);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.cycle, 4);
        assert_eq!(first.snapshot.len(), 2);

        // Loaded: idle ticks stop fetching
        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(repository.current_calls.load(Ordering::SeqCst), 4);

        handle.stop();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_in_flight_at_stop_is_dropped() {
        let gate = Arc::new(Notify::new());
        let mut repository = FakeRepository::with_flow(vec![1.0, 2.0]);
        repository.gate = Some(gate.clone());
        let repository = Arc::new(repository);
        let refresh = RefreshService::new(service(repository.clone()), Duration::from_secs(5), 4);
        let (handle, mut rx) = refresh.spawn();

        while repository.current_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        handle.stop();
        gate.notify_one();

        assert!(rx.recv().await.is_none());
        handle.join().await;
        assert_eq!(repository.current_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_abandons_send_to_full_channel() {
        let repository = Arc::new(FakeRepository::with_flow(vec![1.0]));
        repository.status.lock().unwrap().active = true;
        let refresh = RefreshService::new(service(repository), Duration::from_secs(5), 1);
        let (handle, mut rx) = refresh.spawn();

        // Cycle 1 fills the channel, cycle 2 waits for room
        tokio::time::sleep(Duration::from_secs(6)).await;
        handle.stop();
        handle.join().await;

        assert_eq!(rx.recv().await.unwrap().cycle, 1);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_simulation_publishes_in_order() {
        let repository = Arc::new(FakeRepository::with_flow(vec![1.0, 2.0, 3.0]));
        repository.status.lock().unwrap().active = true;
        let refresh = RefreshService::new(service(repository.clone()), Duration::from_secs(5), 4);
        let (handle, mut rx) = refresh.spawn();

        let cycles: Vec<u64> = vec![
            rx.recv().await.unwrap().cycle,
            rx.recv().await.unwrap().cycle,
            rx.recv().await.unwrap().cycle,
        ];
        assert_eq!(cycles, vec![1, 2, 3]);

        handle.stop();
        handle.join().await;
        while rx.try_recv().is_ok() {}
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_ends_when_consumer_drops() {
        let repository = Arc::new(FakeRepository::with_flow(vec![1.0]));
        repository.status.lock().unwrap().active = true;
        let refresh = RefreshService::new(service(repository), Duration::from_secs(5), 1);
        let (handle, rx) = refresh.spawn();

        drop(rx);
        handle.join().await;
    }
}

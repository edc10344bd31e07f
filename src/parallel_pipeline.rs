// THEORY:
// The `parallel_pipeline` runs the per-object stages (position, color, feature) of
// a frame across a pool of blocking worker threads. Those stages are independent
// per object and the color histogram is the only part of the engine that touches
// every pixel, so it is the part worth spreading out.
//
// A frame is split into contiguous batches, one per worker. A dispatcher task
// takes batches off a queue and hands each one to `spawn_blocking`, holding a
// semaphore permit so at most `worker_count` batches run at once. The async
// runtime threads only ever wait; they never run a histogram. Each batch reports
// back on its own oneshot channel and batches are awaited in order, so the
// features come back in observation order and the sentence is identical to the
// one the sequential pipeline builds.

use crate::config::DescriberConfig;
use crate::core_modules::feature::ObjectFeature;
use crate::core_modules::observation::ObjectObservation;
use crate::core_modules::window::SceneFrame;
use crate::error::DescribeError;
use crate::pipeline::{describe_features, extract_feature};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace};

type BatchResult = Result<Vec<ObjectFeature>, DescribeError>;

struct FeatureTask {
    observations: Vec<ObjectObservation>,
    result_sender: oneshot::Sender<BatchResult>,
}

/// Runs batches of observations through feature extraction on blocking threads.
pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<FeatureTask>,
    dispatcher: JoinHandle<()>,
}

impl WorkerPool {
    /// Spawn the dispatcher for up to `worker_count` concurrent batches. Must be
    /// called inside a tokio runtime.
    pub fn new(worker_count: usize) -> Self {
        let permits = Arc::new(Semaphore::new(worker_count.max(1)));
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<FeatureTask>();

        let dispatcher = tokio::spawn(async move {
            let mut in_flight = JoinSet::new();
            while let Some(task) = task_receiver.recv().await {
                let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                    break;
                };
                in_flight.spawn(run_batch(task, permit));
                while in_flight.try_join_next().is_some() {}
            }
            while in_flight.join_next().await.is_some() {}
        });

        Self {
            task_sender,
            dispatcher,
        }
    }

    pub async fn extract(&self, observations: Vec<ObjectObservation>) -> BatchResult {
        let (result_sender, result_receiver) = oneshot::channel();

        self.task_sender
            .send(FeatureTask {
                observations,
                result_sender,
            })
            .map_err(|_| DescribeError::Worker("Failed to send task to worker pool".to_string()))?;

        result_receiver
            .await
            .map_err(|_| DescribeError::Worker("Failed to receive result from worker".to_string()))?
    }

    /// Stop accepting work and wait for every in-flight batch to finish.
    pub async fn shutdown(self) -> Result<(), DescribeError> {
        drop(self.task_sender);
        self.dispatcher.await?;
        Ok(())
    }
}

async fn run_batch(task: FeatureTask, permit: OwnedSemaphorePermit) {
    let FeatureTask {
        observations,
        result_sender,
    } = task;

    let joined = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        trace!(objects = observations.len(), "Extracting batch");
        observations.iter().map(extract_feature).collect::<BatchResult>()
    })
    .await;

    // A panicking batch surfaces as a worker error instead of a dropped channel.
    let result = joined.map_err(DescribeError::from).and_then(|batch| batch);
    let _ = result_sender.send(result);
}

/// Parallel counterpart of `SceneDescriber`.
pub struct ParallelDescriber {
    config: DescriberConfig,
    worker_count: usize,
    pool: WorkerPool,
}

impl ParallelDescriber {
    /// Must be called inside a tokio runtime.
    pub fn new(config: DescriberConfig) -> Result<Self, DescribeError> {
        config.validate()?;
        let worker_count = config.effective_worker_count();
        debug!(worker_count, "Starting parallel describer");
        Ok(Self {
            pool: WorkerPool::new(worker_count),
            worker_count,
            config,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub async fn extract_frame(&self, observations: &[ObjectObservation]) -> Result<SceneFrame, DescribeError> {
        if observations.is_empty() {
            return Ok(SceneFrame::default());
        }

        let batch_size = observations.len().div_ceil(self.worker_count);
        let batches = observations
            .chunks(batch_size)
            .map(|batch| self.pool.extract(batch.to_vec()));

        let features = try_join_all(batches).await?.into_iter().flatten().collect();
        Ok(SceneFrame::new(features))
    }

    pub async fn describe(&self, observations: &[ObjectObservation]) -> Result<String, DescribeError> {
        let frame = self.extract_frame(observations).await?;
        describe_features(
            &frame.features,
            self.config.include_color,
            self.config.include_position,
        )
    }

    pub async fn shutdown(self) -> Result<(), DescribeError> {
        self.pool.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::observation::BoundingBox;
    use crate::pipeline::describe_scene;
    use image::{Rgb, RgbImage};
    use std::sync::Arc;

    fn striped_frame() -> Arc<RgbImage> {
        // Four vertical 100px stripes: red, green, blue, black.
        let colors = [[150, 20, 20], [20, 150, 20], [20, 20, 150], [10, 10, 10]];
        let mut image = RgbImage::new(400, 100);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgb(colors[(x / 100) as usize]);
        }
        Arc::new(image)
    }

    fn observations() -> Vec<ObjectObservation> {
        let image = striped_frame();
        let categories = ["cup", "cup", "book", "cup", "mouse", "mouse", "person"];
        categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let stripe = (i % 4) as f64 * 100.0;
                let bbox = BoundingBox::new(10.0, stripe + 5.0, 90.0, stripe + 95.0);
                ObjectObservation::new(*category, 0.9, bbox, Arc::clone(&image))
            })
            .collect()
    }

    #[tokio::test]
    async fn matches_sequential_pipeline() {
        let config = DescriberConfig {
            worker_count: Some(3),
            ..DescriberConfig::default()
        };
        let describer = ParallelDescriber::new(config).unwrap();
        let observations = observations();

        let parallel = describer.describe(&observations).await.unwrap();
        let sequential = describe_scene(&observations, true, true).unwrap();
        assert_eq!(parallel, sequential);
        assert!(!parallel.is_empty());

        describer.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn preserves_observation_order() {
        let config = DescriberConfig {
            worker_count: Some(4),
            ..DescriberConfig::default()
        };
        let describer = ParallelDescriber::new(config).unwrap();
        let observations = observations();
        let frame = describer.extract_frame(&observations).await.unwrap();

        let categories: Vec<&str> = frame.features.iter().map(|f| f.category.as_str()).collect();
        assert_eq!(categories, vec!["cup", "cup", "book", "cup", "mouse", "mouse", "person"]);
        describer.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn empty_frame_is_empty_description() {
        let describer = ParallelDescriber::new(DescriberConfig::default()).unwrap();
        assert!(describer.worker_count() >= 1);
        assert_eq!(describer.describe(&[]).await.unwrap(), "");
        describer.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn runtime_keeps_ticking_during_describe() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::{Duration, Instant};

        let image = Arc::new(RgbImage::from_pixel(3000, 3000, Rgb([150, 20, 20])));
        let observations: Vec<ObjectObservation> = (0..4)
            .map(|_| {
                let bbox = BoundingBox::new(0.0, 0.0, 3000.0, 3000.0);
                ObjectObservation::new("cup", 0.9, bbox, Arc::clone(&image))
            })
            .collect();
        let describer = ParallelDescriber::new(DescriberConfig {
            worker_count: Some(4),
            ..DescriberConfig::default()
        })
        .unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let ticker_done = Arc::clone(&done);
        let ticker = tokio::spawn(async move {
            let mut max_gap = Duration::ZERO;
            while !ticker_done.load(Ordering::SeqCst) {
                let before = Instant::now();
                tokio::time::sleep(Duration::from_millis(5)).await;
                max_gap = max_gap.max(before.elapsed());
            }
            max_gap
        });

        let description = describer.describe(&observations).await.unwrap();
        done.store(true, Ordering::SeqCst);
        let max_gap = ticker.await.unwrap();

        assert_eq!(description, "4 red cups to your center");
        assert!(max_gap < Duration::from_millis(200), "runtime stalled for {max_gap:?}");
        describer.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn pool_accepts_more_batches_than_workers() {
        let pool = WorkerPool::new(1);
        let observations = observations();
        let batches = observations.chunks(2).map(|batch| pool.extract(batch.to_vec()));
        let features: Vec<ObjectFeature> = try_join_all(batches).await.unwrap().into_iter().flatten().collect();
        assert_eq!(features.len(), observations.len());
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn batch_errors_propagate() {
        let describer = ParallelDescriber::new(DescriberConfig {
            worker_count: Some(2),
            ..DescriberConfig::default()
        })
        .unwrap();
        let mut observations = observations();
        observations[5].bbox = BoundingBox::new(10.0, 300.0, 90.0, 200.0);

        let err = describer.describe(&observations).await.unwrap_err();
        assert!(matches!(err, DescribeError::Validation(_)));
        describer.shutdown().await.unwrap();
    }
}

use tracing::error;
use tracing::info;

use super::sample::LayeredSceneSample;

/// Final GPU drain so nothing the destructors release is still referenced
/// by in-flight work. The fence event closes when the scheduler drops.
pub fn on_destroy(sample: &mut LayeredSceneSample) {
    if let Some(resources) = &mut sample.resources {
        if let Err(e) = resources.scheduler.flush(&resources.command_queue) {
            error!("error draining GPU on destroy: {e:?}");
        }
    }
    info!("sample destroyed");
}

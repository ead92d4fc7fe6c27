//! Consistency sweep: purging bindings whose source went away behind the
//! registry's back.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use model_registry_sdk::{BindingId, ModelBinding};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::service::ModelRegistryService;

/// Returns the ids of the bindings whose source is no longer valid.
///
/// A check that errors or panics counts as invalid and does not stop the
/// remaining checks.
#[must_use]
pub fn find_invalid(bindings: &[Arc<ModelBinding>]) -> HashSet<BindingId> {
    bindings
        .iter()
        .filter(|binding| !is_valid(binding))
        .map(|binding| binding.id())
        .collect()
}

fn is_valid(binding: &ModelBinding) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| binding.source().check_valid())) {
        Ok(Ok(valid)) => {
            if !valid {
                debug!(
                    binding = %binding.id(),
                    module = %binding.owner(),
                    "Model source reports itself invalid"
                );
            }
            valid
        }
        Ok(Err(e)) => {
            warn!(
                binding = %binding.id(),
                module = %binding.owner(),
                error = %e,
                "Validity check failed, treating binding as invalid"
            );
            false
        }
        Err(_) => {
            warn!(
                binding = %binding.id(),
                module = %binding.owner(),
                "Validity check panicked, treating binding as invalid"
            );
            false
        }
    }
}

/// Periodically sweeps `service` until `cancellation_token` fires.
///
/// The first sweep runs one full `every` after start.
///
/// # Example
///
/// ```ignore
/// let cancel = CancellationToken::new();
/// let handle = tokio::spawn(run_sweep_task(service.clone(), Duration::from_secs(60), cancel.clone()));
///
/// // On shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub async fn run_sweep_task(
    service: Arc<ModelRegistryService>,
    every: Duration,
    cancellation_token: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = cancellation_token.cancelled() => {
                info!("Model registry sweep task shutting down");
                break;
            }
            _ = interval.tick() => {
                let removed = service.sweep_invalid();
                debug!(removed, "Periodic consistency sweep finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use model_registry_sdk::{ModelSource, ModelSourceError, ModuleId, NewModelBinding};

    enum Verdict {
        Valid,
        Invalid,
        Fails,
        Panics,
    }

    struct ScriptedSource(Verdict);

    impl ModelSource for ScriptedSource {
        fn check_valid(&self) -> Result<bool, ModelSourceError> {
            match self.0 {
                Verdict::Valid => Ok(true),
                Verdict::Invalid => Ok(false),
                Verdict::Fails => Err(ModelSourceError::new("factory unreachable")),
                Verdict::Panics => panic!("factory torn down"),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn binding(id: u64, verdict: Verdict) -> Arc<ModelBinding> {
        Arc::new(ModelBinding::new(
            BindingId(id),
            ModuleId::new("m"),
            NewModelBinding::new("C", Arc::new(ScriptedSource(verdict))),
        ))
    }

    #[test]
    fn test_find_invalid_covers_every_failure_mode() {
        let bindings = vec![
            binding(1, Verdict::Valid),
            binding(2, Verdict::Invalid),
            binding(3, Verdict::Fails),
            binding(4, Verdict::Panics),
            binding(5, Verdict::Valid),
        ];

        let invalid = find_invalid(&bindings);
        assert_eq!(invalid, HashSet::from([BindingId(2), BindingId(3), BindingId(4)]));
    }

    #[test]
    fn test_find_invalid_on_empty_snapshot() {
        assert!(find_invalid(&[]).is_empty());
    }
}

//! Start/stop state machine for host-managed resources.
//!
//! One generic machine, instantiated for the worker instances and for the
//! embedded REST service. Every transition check happens under the state
//! lock before the host is contacted, so at most one start or stop is in
//! flight per machine. The lock is never held across an `await`.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use hostctl_common::HostCommand;

use crate::application::ports::CommandBridge;
use crate::application::services::bridge_client::BridgeClient;
use crate::application::services::settings_store::SharedSettings;
use crate::domain::{LifecycleError, LifecycleState, Phase, StartOutcome};

// ── Resources ─────────────────────────────────────────────────────────────────

/// Result of the check a resource runs before a start is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preflight {
    Proceed,
    PortUnavailable,
}

/// A host-side resource a [`LifecycleMachine`] can manage.
#[allow(async_fn_in_trait)]
pub trait ManagedResource {
    /// Human-readable name used in errors and logs.
    const NAME: &'static str;
    /// Status command answering whether the resource is running.
    const STATUS: HostCommand;
    const START: HostCommand;
    const STOP: HostCommand;

    /// Check run before every start attempt.
    ///
    /// # Errors
    ///
    /// A precondition violation, or the failure of a host check.
    async fn preflight<B: CommandBridge>(
        client: &BridgeClient<B>,
        settings: &SharedSettings,
    ) -> Result<Preflight>;
}

/// The worker instances.
#[derive(Debug)]
pub struct Instances;

impl ManagedResource for Instances {
    const NAME: &'static str = "instances";
    const STATUS: HostCommand = HostCommand::IsInstanceStarted;
    const START: HostCommand = HostCommand::StartInstances;
    const STOP: HostCommand = HostCommand::StopInstances;

    async fn preflight<B: CommandBridge>(
        _client: &BridgeClient<B>,
        settings: &SharedSettings,
    ) -> Result<Preflight> {
        let has_archive = settings
            .read(|s| !s.resource.archive_path.is_empty())
            .unwrap_or(false);
        if !has_archive {
            return Err(LifecycleError::MissingArchivePath.into());
        }
        Ok(Preflight::Proceed)
    }
}

/// The embedded REST service. Starting it first asks the host whether the
/// configured port is free.
#[derive(Debug)]
pub struct RestApi;

impl ManagedResource for RestApi {
    const NAME: &'static str = "rest api";
    const STATUS: HostCommand = HostCommand::IsRestApiStarted;
    const START: HostCommand = HostCommand::StartRestApi;
    const STOP: HostCommand = HostCommand::StopRestApi;

    async fn preflight<B: CommandBridge>(
        client: &BridgeClient<B>,
        settings: &SharedSettings,
    ) -> Result<Preflight> {
        let port = settings.read(|s| s.service.port).unwrap_or(0);
        if client.is_port_available(port).await? {
            Ok(Preflight::Proceed)
        } else {
            tracing::warn!(port, "rest api port unavailable");
            Ok(Preflight::PortUnavailable)
        }
    }
}

pub type InstanceMachine<B> = LifecycleMachine<Instances, B>;
pub type ServiceMachine<B> = LifecycleMachine<RestApi, B>;

// ── Machine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MachineState {
    public: LifecycleState,
    /// A start has been accepted and is running its preflight.
    claimed: bool,
}

/// Releases a start claim when the start request ends, however it ends.
struct StartClaim<'a> {
    state: &'a Mutex<MachineState>,
}

impl Drop for StartClaim<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .claimed = false;
    }
}

/// Moves the machine to `Failed` if a start or stop is abandoned mid-flight.
///
/// A completed transition has already left `phase` by the time this drops,
/// so only a dropped future finds the phase unchanged.
struct Transition<'a> {
    state: &'a Mutex<MachineState>,
    phase: Phase,
    resource: &'static str,
}

impl Drop for Transition<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.public.phase == self.phase {
            state.public.phase = Phase::Failed;
            drop(state);
            tracing::warn!(resource = self.resource, phase = %self.phase, "transition abandoned");
        }
    }
}

/// Start/stop state machine for the resource `R`.
pub struct LifecycleMachine<R, B> {
    client: Arc<BridgeClient<B>>,
    settings: SharedSettings,
    state: Mutex<MachineState>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ManagedResource, B: CommandBridge> LifecycleMachine<R, B> {
    #[must_use]
    pub fn new(client: Arc<BridgeClient<B>>, settings: SharedSettings) -> Self {
        Self {
            client,
            settings,
            state: Mutex::new(MachineState::default()),
            _resource: PhantomData,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MachineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: Phase) {
        self.lock().public.phase = phase;
    }

    fn transition(&self, phase: Phase) -> Transition<'_> {
        Transition {
            state: &self.state,
            phase,
            resource: R::NAME,
        }
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lock().public
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().public.phase
    }

    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.phase() == Phase::Starting
    }

    #[must_use]
    pub fn is_stopping(&self) -> bool {
        self.phase() == Phase::Stopping
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase() == Phase::Started
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.phase() == Phase::Failed
    }

    #[must_use]
    pub fn port_available(&self) -> bool {
        self.lock().public.port_available
    }

    /// Resynchronize the phase with what the host reports.
    ///
    /// Used at startup, when the host may already be running the resource.
    /// A transition in flight is left alone; the host's answer is still
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the host failure; the phase is unchanged in that case.
    pub async fn refresh(&self) -> Result<bool> {
        let started = self.client.status(R::STATUS).await?;
        let mut state = self.lock();
        if !state.public.phase.is_transient() && !state.claimed {
            state.public.phase = Phase::from_status(started);
        }
        drop(state);
        tracing::debug!(resource = R::NAME, started, "status queried");
        Ok(started)
    }

    fn claim_start(&self) -> Result<StartClaim<'_>, LifecycleError> {
        let mut state = self.lock();
        match state.public.phase {
            Phase::Starting | Phase::Started => {
                return Err(LifecycleError::AlreadyStarted { resource: R::NAME });
            }
            Phase::Stopping => {
                return Err(LifecycleError::Busy {
                    resource: R::NAME,
                    phase: Phase::Stopping,
                });
            }
            Phase::Idle | Phase::Failed => {}
        }
        if state.claimed {
            return Err(LifecycleError::AlreadyStarted { resource: R::NAME });
        }
        state.claimed = true;
        Ok(StartClaim { state: &self.state })
    }

    /// Start the resource.
    ///
    /// Refused without contacting the host while a start is already in
    /// flight or the resource is up. When the preflight reports the port as
    /// taken, `port_available` is cleared and the phase is left untouched.
    /// A start dropped while the host call is in flight leaves `Failed`.
    ///
    /// # Errors
    ///
    /// A [`LifecycleError`] for refused requests, or the host failure, in
    /// which case the machine is left in `Failed`.
    pub async fn start(&self) -> Result<StartOutcome> {
        let _claim = self.claim_start()?;

        if R::preflight(&self.client, &self.settings).await? == Preflight::PortUnavailable {
            self.lock().public.port_available = false;
            return Ok(StartOutcome::PortUnavailable);
        }

        {
            let mut state = self.lock();
            state.public.port_available = true;
            state.public.phase = Phase::Starting;
        }
        let _transition = self.transition(Phase::Starting);
        tracing::info!(resource = R::NAME, "starting");

        match self.client.trigger(R::START).await {
            Ok(()) => {
                self.set_phase(Phase::Started);
                tracing::info!(resource = R::NAME, "started");
                Ok(StartOutcome::Started)
            }
            Err(err) => {
                self.set_phase(Phase::Failed);
                tracing::error!(resource = R::NAME, error = %err, "failed to start");
                Err(err.into())
            }
        }
    }

    fn claim_stop(&self) -> Result<(), LifecycleError> {
        let mut state = self.lock();
        let phase = state.public.phase;
        match phase {
            Phase::Started | Phase::Failed if !state.claimed => {
                state.public.phase = Phase::Stopping;
                Ok(())
            }
            phase @ (Phase::Starting | Phase::Stopping) => Err(LifecycleError::Busy {
                resource: R::NAME,
                phase,
            }),
            _ => Err(LifecycleError::NotStarted { resource: R::NAME }),
        }
    }

    /// Stop the resource.
    ///
    /// Only a started (or failed) resource can be stopped; anything else is
    /// refused without contacting the host.
    ///
    /// # Errors
    ///
    /// A [`LifecycleError`] for refused requests, or the host failure, in
    /// which case the machine is left in `Failed`.
    pub async fn stop(&self) -> Result<()> {
        self.claim_stop()?;
        let _transition = self.transition(Phase::Stopping);
        tracing::info!(resource = R::NAME, "stopping");

        match self.client.trigger(R::STOP).await {
            Ok(()) => {
                self.set_phase(Phase::Idle);
                tracing::info!(resource = R::NAME, "stopped");
                Ok(())
            }
            Err(err) => {
                self.set_phase(Phase::Failed);
                tracing::error!(resource = R::NAME, error = %err, "failed to stop");
                Err(err.into())
            }
        }
    }
}

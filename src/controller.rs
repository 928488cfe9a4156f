//! Ride session controller.
//!
//! Owns the ride state machine (`Idle` / `Active`), the traveled path and the
//! status label. Route queries run on the rayon pool; their results come back
//! through the controller's mailbox and are applied on the owning thread only
//! if they belong to the most recently issued query.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::coordinate::Coordinate;
use crate::error::{PreconditionError, RideError};
use crate::map::MapProjection;
use crate::position::{PositionError, PositionFix};
use crate::refresh::{IssuedQuery, RefreshPolicy};
use crate::route::{RouteQueryError, RouteSummary};
use crate::session::{RideSession, RideState};
use crate::summary::{self, RideSummary, StatusLabel};
use crate::traits::RouteProvider;

/// Identifies one issued route query. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// A finished route query, handed back to the owning controller.
#[derive(Debug)]
pub struct RouteQueryCompletion {
    pub token: RequestToken,
    pub origin: Coordinate,
    pub result: Result<RouteSummary, RouteQueryError>,
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum RideEvent {
    Position(PositionFix),
    /// A tap on the map, a candidate destination.
    Tap(Coordinate),
    /// The start/end control was pressed.
    Toggle,
    Stop,
    RouteResolved(RouteQueryCompletion),
    PositionUnavailable(PositionError),
    FeedEnded,
    Shutdown,
}

/// Discriminant of a `RideEvent`, for callbacks that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Position,
    Tap,
    Toggle,
    Stop,
    RouteResolved,
    PositionUnavailable,
    FeedEnded,
    Shutdown,
}

impl RideEvent {
    /// The event's discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            RideEvent::Position(_) => EventKind::Position,
            RideEvent::Tap(_) => EventKind::Tap,
            RideEvent::Toggle => EventKind::Toggle,
            RideEvent::Stop => EventKind::Stop,
            RideEvent::RouteResolved(_) => EventKind::RouteResolved,
            RideEvent::PositionUnavailable(_) => EventKind::PositionUnavailable,
            RideEvent::FeedEnded => EventKind::FeedEnded,
            RideEvent::Shutdown => EventKind::Shutdown,
        }
    }
}

/// Single owner of the ride session.
///
/// All mutation happens through `&mut self` on the thread holding the
/// controller; other threads talk to it through `mailbox()`.
pub struct RideController<P> {
    provider: Arc<P>,
    session: RideSession,
    refresh: RefreshPolicy,
    status: StatusLabel,
    last_fix: Option<PositionFix>,
    last_query: Option<IssuedQuery>,
    outstanding: Option<RequestToken>,
    next_token: u64,
    mailbox_tx: Sender<RideEvent>,
    mailbox_rx: Receiver<RideEvent>,
}

impl<P> RideController<P>
where
    P: RouteProvider + 'static,
{
    /// Creates an idle controller querying `provider` for routes.
    pub fn new(provider: P) -> Self {
        Self::with_shared_provider(Arc::new(provider))
    }

    /// Like `new`, for a provider that is shared elsewhere.
    pub fn with_shared_provider(provider: Arc<P>) -> Self {
        let (mailbox_tx, mailbox_rx) = mpsc::channel();
        Self {
            provider,
            session: RideSession::default(),
            refresh: RefreshPolicy::default(),
            status: StatusLabel::ChooseDestination,
            last_fix: None,
            last_query: None,
            outstanding: None,
            next_token: 1,
            mailbox_tx,
            mailbox_rx,
        }
    }

    /// Replaces the default refresh-on-every-update policy.
    pub fn with_refresh_policy(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    /// A sender for position feeds, taps and other producers.
    pub fn mailbox(&self) -> Sender<RideEvent> {
        self.mailbox_tx.clone()
    }

    /// Read-only view of the session state.
    pub fn session(&self) -> &RideSession {
        &self.session
    }

    /// `Active` while a ride is in progress.
    pub fn state(&self) -> RideState {
        self.session.state()
    }

    /// What the status label currently says.
    pub fn status(&self) -> &StatusLabel {
        &self.status
    }

    /// The status label as display text.
    pub fn status_text(&self) -> String {
        self.status.to_string()
    }

    /// Label for the start/end control.
    pub fn toggle_label(&self) -> &'static str {
        match self.state() {
            RideState::Idle => summary::START_LABEL,
            RideState::Active => summary::END_LABEL,
        }
    }

    /// Whether map taps may change the destination right now.
    pub fn can_change_destination(&self) -> bool {
        !self.session.is_active()
    }

    /// The last reported position, known in every state.
    pub fn current_position(&self) -> Option<Coordinate> {
        self.last_fix.map(|fix| fix.coordinate)
    }

    /// The route query whose result would still be applied, if any.
    pub fn outstanding_query(&self) -> Option<RequestToken> {
        self.outstanding
    }

    /// What the map surface should draw.
    ///
    /// A planned route whose geometry fails to decode is left off the map.
    pub fn projection(&self) -> MapProjection {
        MapProjection {
            destination_marker: self.session.destination(),
            planned_route: self.session.planned_route().and_then(RouteSummary::geometry),
            traveled_path: self.session.traveled_path().to_polyline(),
            camera: self.current_position(),
            taps_enabled: self.can_change_destination(),
        }
    }

    /// Stores a new destination. Ignored while a ride is active.
    ///
    /// Returns whether the destination was accepted.
    pub fn set_destination(&mut self, destination: Coordinate) -> bool {
        if self.session.is_active() {
            debug!(%destination, "ignoring destination change during ride");
            return false;
        }
        debug!(%destination, "destination selected");
        self.session.destination = Some(destination);
        true
    }

    /// Forgets the pending destination. Ignored while a ride is active.
    pub fn clear_destination(&mut self) -> bool {
        if self.session.is_active() {
            return false;
        }
        self.session.destination = None;
        true
    }

    /// Starts a ride from `current_position` towards the selected destination.
    ///
    /// On a failed precondition nothing changes except the status label,
    /// which prompts for a destination.
    pub fn start_ride(
        &mut self,
        current_position: Option<Coordinate>,
    ) -> Result<(), PreconditionError> {
        if self.session.is_active() {
            return Err(PreconditionError::AlreadyRiding);
        }
        let Some(destination) = self.session.destination else {
            self.status = StatusLabel::SelectDestinationFirst;
            return Err(PreconditionError::MissingDestination);
        };
        let Some(origin) = current_position else {
            self.status = StatusLabel::SelectDestinationFirst;
            return Err(PreconditionError::MissingPosition);
        };

        info!(%origin, %destination, "ride started");
        self.session.traveled_path.clear();
        self.session.planned_route = None;
        self.session.is_active = true;
        self.last_query = None;

        let now = self.last_fix.map(|fix| fix.timestamp).unwrap_or_else(Instant::now);
        self.issue_query(origin, destination, now);
        self.refresh_status(Some(origin));
        Ok(())
    }

    /// Ends the ride and clears everything the map shows. Idempotent.
    pub fn stop_ride(&mut self) {
        if self.session.is_active() {
            info!(
                traveled_m = self.session.traveled_path().length_m(),
                points = self.session.traveled_path().len(),
                "ride ended"
            );
        }
        self.session.reset();
        self.last_query = None;
        self.outstanding = None;
        self.status = StatusLabel::ChooseDestination;
    }

    /// The single start/end control.
    pub fn toggle(&mut self) -> Result<(), PreconditionError> {
        match self.state() {
            RideState::Active => {
                self.stop_ride();
                Ok(())
            }
            RideState::Idle => self.start_ride(self.current_position()),
        }
    }

    /// Records a position fix.
    ///
    /// While idle this only moves the camera. While riding it extends the
    /// traveled path, issues a route refresh when the policy allows it and
    /// rebuilds the summary from the last known route.
    pub fn on_position_update(&mut self, fix: PositionFix) {
        self.last_fix = Some(fix);
        if !self.session.is_active() {
            return;
        }
        let Some(destination) = self.session.destination else {
            return;
        };

        self.session.traveled_path.push(fix.coordinate);

        if self
            .refresh
            .is_due(self.last_query.as_ref(), fix.timestamp, fix.coordinate)
        {
            self.issue_query(fix.coordinate, destination, fix.timestamp);
        }

        self.refresh_status(Some(fix.coordinate));
    }

    /// Applies a finished route query.
    ///
    /// Returns whether the result replaced the planned route. Results from
    /// superseded queries, or arriving after the ride stopped, are dropped.
    pub fn on_route_query_result(&mut self, completion: RouteQueryCompletion) -> bool {
        let RouteQueryCompletion {
            token,
            origin,
            result,
        } = completion;

        if !self.session.is_active() || self.outstanding != Some(token) {
            debug!(token = token.0, "discarding stale route result");
            return false;
        }
        self.outstanding = None;

        match result {
            Ok(route) => {
                debug!(
                    token = token.0,
                    %origin,
                    remaining = %route.remaining_distance_text,
                    eta = %route.estimated_duration_text,
                    "route refreshed"
                );
                self.session.planned_route = Some(route);
                self.refresh_status(self.session.traveled_path().last().or(Some(origin)));
                true
            }
            Err(err) => {
                warn!(token = token.0, error = %err, "route refresh failed, keeping previous route");
                false
            }
        }
    }

    /// Dispatches one event to the matching operation.
    ///
    /// Failed preconditions and position errors are returned after the
    /// status label has been updated.
    pub fn handle(&mut self, event: RideEvent) -> Result<(), RideError> {
        match event {
            RideEvent::Position(fix) => self.on_position_update(fix),
            RideEvent::Tap(coordinate) => {
                self.set_destination(coordinate);
            }
            RideEvent::Toggle => self.toggle()?,
            RideEvent::Stop => self.stop_ride(),
            RideEvent::RouteResolved(completion) => {
                self.on_route_query_result(completion);
            }
            RideEvent::PositionUnavailable(err) => {
                if !self.session.is_active() {
                    self.status = StatusLabel::LocationUnavailable;
                }
                return Err(err.into());
            }
            RideEvent::FeedEnded => debug!("position feed ended"),
            RideEvent::Shutdown => {}
        }
        Ok(())
    }

    /// Handles everything already queued without blocking.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.mailbox_rx.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Waits up to `timeout` for one event and handles it.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.mailbox_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Handles events until `RideEvent::Shutdown`, calling `on_event` after
    /// each one.
    pub fn run(&mut self, mut on_event: impl FnMut(&mut Self, EventKind)) {
        while let Ok(event) = self.mailbox_rx.recv() {
            let kind = event.kind();
            if kind == EventKind::Shutdown {
                break;
            }
            self.dispatch(event);
            on_event(self, kind);
        }
    }

    fn dispatch(&mut self, event: RideEvent) {
        if let Err(err) = self.handle(event) {
            debug!(error = %err, "event not applied");
        }
    }

    fn issue_query(&mut self, origin: Coordinate, destination: Coordinate, now: Instant) {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.outstanding = Some(token);
        self.last_query = Some(IssuedQuery { at: now, origin });

        debug!(token = token.0, %origin, %destination, "issuing route query");

        let provider = Arc::clone(&self.provider);
        let mailbox = self.mailbox_tx.clone();
        rayon::spawn(move || {
            let result = provider.fetch_route(origin, destination);
            let _ = mailbox.send(RideEvent::RouteResolved(RouteQueryCompletion {
                token,
                origin,
                result,
            }));
        });
    }

    fn refresh_status(&mut self, position: Option<Coordinate>) {
        let arrived = match (position, self.session.destination) {
            (Some(position), Some(destination)) => {
                summary::has_arrived(position.distance_to(&destination))
            }
            _ => false,
        };
        let already_arrived = matches!(&self.status, StatusLabel::Riding(summary) if summary.arrived);
        if arrived && !already_arrived {
            info!("arrived at destination");
        }

        self.status = StatusLabel::Riding(RideSummary::new(
            self.session.traveled_path().length_m(),
            self.session.planned_route(),
            arrived,
        ));
    }
}

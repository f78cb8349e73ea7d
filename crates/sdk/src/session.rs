/// Session changes the client makes on its own while serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new token pair was stored after an expired access token.
    TokensRefreshed,
    /// The stored tokens were cleared; the user has to sign in again.
    LoggedOut,
    /// A refresh succeeded but the backend still reports the token expired.
    ReauthenticationRequired,
}

/// Receives [`SessionEvent`]s, e.g. to send a UI back to its login screen.
pub trait SessionListener: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn on_event(&self, event: SessionEvent) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionListener;

impl SessionListener for NoopSessionListener {
    fn on_event(&self, _event: SessionEvent) {}
}

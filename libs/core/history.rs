use mit_store::{SessionSummary, Store, SummaryId, UserId};

use crate::Core;

/// The history view lists at most this many past checkouts
pub const HISTORY_LIMIT: u32 = 30;

impl Core {
    /// Past session summaries of the user, newest session date first.
    pub async fn history(&self, user_id: &UserId) -> eyre::Result<Vec<SessionSummary>> {
        let summaries = self
            .store
            .list_session_summaries(user_id.clone(), HISTORY_LIMIT)
            .await?;
        Ok(summaries)
    }

    /// Remove one summary row, immediately and irreversibly. Task rows of
    /// that day stay in place.
    pub async fn delete_history_entry(&self, id: SummaryId) -> eyre::Result<()> {
        self.store.delete_session_summary(id).await?;
        Ok(())
    }

    /// A summary is only editable while its session date is still today.
    pub fn is_editable(summary: &SessionSummary) -> bool {
        summary.session_date == Self::today()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mit_config::CoreConfig;
    use mit_store::store::in_memory::InMemoryBackend;
    use mit_store::{Auth, AuthBox, Backend, DayTotals, Store, StoreBox, UserId};

    use crate::Core;

    async fn signed_in_core() -> (Core, InMemoryBackend, UserId) {
        let backend = InMemoryBackend::new();
        let user_id = backend
            .sign_up("ana@acme.example".into(), "secret1".into())
            .await
            .unwrap();
        let core = Core::with_backend(
            Backend {
                store: StoreBox::new(backend.clone()),
                auth: AuthBox::new(backend.clone()),
            },
            CoreConfig {
                email_domain: "acme.example".to_owned(),
                default_profile_name: None,
            },
        );
        (core, backend, user_id)
    }

    #[tokio::test]
    async fn history_lists_newest_first() -> eyre::Result<()> {
        let (core, backend, user) = signed_in_core().await;
        let today = Core::today();

        for days_ago in [2, 0, 1] {
            backend
                .upsert_session_summary(
                    user.clone(),
                    today - Duration::days(days_ago),
                    DayTotals::default(),
                )
                .await?;
        }

        let history = core.history(&user).await?;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].session_date, today);
        assert_eq!(history[2].session_date, today - Duration::days(2));

        assert!(Core::is_editable(&history[0]));
        assert!(!Core::is_editable(&history[1]));
        Ok(())
    }

    #[tokio::test]
    async fn deleted_entries_stay_gone() -> eyre::Result<()> {
        let (core, backend, user) = signed_in_core().await;
        let today = Core::today();

        backend
            .upsert_session_summary(user.clone(), today, DayTotals::default())
            .await?;
        let victim = backend
            .upsert_session_summary(
                user.clone(),
                today - Duration::days(1),
                DayTotals::default(),
            )
            .await?;

        core.delete_history_entry(victim.id.clone()).await?;

        let history = core.history(&user).await?;
        assert_eq!(history.len(), 1);
        assert!(history.iter().all(|s| s.id != victim.id));

        // a repeat fetch does not resurrect it
        let again = core.history(&user).await?;
        assert_eq!(again.len(), 1);
        Ok(())
    }
}

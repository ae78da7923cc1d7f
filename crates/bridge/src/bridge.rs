// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The long-poller itself: pulls Telegram updates, ACL-checks the chat,
//! routes the message, and hands the resulting job to the scheduler behind
//! a freshly posted progress message.

use crate::error::BridgeError;
use crate::progress_sink::{DeliveryMode, TelegramProgressSink};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use takopi_config::Config;
use takopi_core::{Clock, EngineId};
use takopi_presenter::Presenter;
use takopi_router::{IncomingMessage, Job, Router};
use takopi_runner::Runner;
use takopi_scheduler::Scheduler;
use takopi_telegram::{TelegramClient, TgMessage};
use takopi_worktree::WorktreeResolver;

pub struct Bridge {
    telegram: Arc<dyn TelegramClient>,
    registry: Vec<Arc<dyn Runner>>,
    router: Router,
    scheduler: Arc<Scheduler>,
    worktree: WorktreeResolver,
    config: Config,
    delivery: DeliveryMode,
    final_notify: bool,
    default_cwd: PathBuf,
    clock: Arc<dyn Clock>,
}

impl Bridge {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        telegram: Arc<dyn TelegramClient>,
        registry: Vec<Arc<dyn Runner>>,
        scheduler: Arc<Scheduler>,
        worktree: WorktreeResolver,
        config: Config,
        default_engine: EngineId,
        delivery: DeliveryMode,
        final_notify: bool,
        default_cwd: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let known_projects: HashSet<String> = config.projects.keys().cloned().collect();
        let router = Router::new(registry.clone(), known_projects, default_engine);
        Self {
            telegram,
            registry,
            router,
            scheduler,
            worktree,
            config,
            delivery,
            final_notify,
            default_cwd,
            clock,
        }
    }

    /// Drains the backlog once on startup (updates already queued before
    /// this process existed are discarded, not replayed) then polls forever.
    pub async fn run(self: Arc<Self>) -> Result<(), BridgeError> {
        let mut offset: i64 = 0;

        loop {
            let updates = self.telegram.long_poll(offset, 30).await?;
            for update in updates {
                offset = update.update_id + 1;
                let Some(message) = update.message else { continue };
                let bridge = self.clone();
                tokio::spawn(async move { bridge.handle_message(message).await });
            }
        }
    }

    fn project_alias_for_chat(&self, chat_id: i64) -> Option<String> {
        self.config
            .projects
            .iter()
            .find(|(_, project)| project.chat_id == chat_id)
            .map(|(alias, _)| alias.clone())
    }

    fn runner_for(&self, engine: &EngineId) -> Option<Arc<dyn Runner>> {
        self.registry.iter().find(|r| &r.engine() == engine).cloned()
    }

    async fn handle_message(&self, message: TgMessage) {
        let chat_id = message.chat.id;
        let Some(alias) = self.project_alias_for_chat(chat_id) else {
            tracing::warn!(chat_id, "message from an unconfigured chat; dropping");
            return;
        };

        let text = message.text.clone().unwrap_or_default();

        if let Some(reply) = &message.reply_to_message {
            if is_cancel_command(&text) {
                let reply_text = reply.text.as_deref().unwrap_or_default();
                let cancelled = self.handle_cancel(reply_text).await;
                if !cancelled {
                    tracing::warn!(chat_id, "/cancel had no active run to cancel");
                }
                return;
            }
        }

        let incoming = IncomingMessage {
            text,
            reply_text: message.reply_to_message.as_ref().and_then(|m| m.text.clone()),
            chat_id,
            sender_id: message.from.as_ref().map(|f| f.id).unwrap_or(0),
            message_id: message.message_id,
            reply_to_id: message.reply_to_message.as_ref().map(|m| m.message_id),
            topic_id: message.message_thread_id,
        };

        match self.router.route(&incoming) {
            Ok(job) => {
                if let Err(error) = self.dispatch(job, &alias).await {
                    tracing::warn!(%error, chat_id, "failed to dispatch job");
                    self.reply_error(chat_id, &error.to_string()).await;
                }
            }
            Err(error) => self.reply_error(chat_id, &error.to_string()).await,
        }
    }

    /// A replied-to progress message always carries the resume line once
    /// its run has started, so recovering the `ThreadKey` needs no
    /// message-id bookkeeping of our own.
    async fn handle_cancel(&self, replied_text: &str) -> bool {
        let Some(token) = self.registry.iter().find_map(|r| r.extract_resume(replied_text)) else {
            return false;
        };
        self.scheduler.cancel(&token.thread_key()).await
    }

    async fn dispatch(&self, job: Job, chat_alias: &str) -> Result<(), BridgeError> {
        let Some(runner) = self.runner_for(&job.adapter) else {
            return Err(BridgeError::UnknownEngine(job.adapter));
        };

        let project_for_cwd = job.project_ctx.clone().or_else(|| Some(chat_alias.to_string()));
        let cwd = self.resolve_cwd(project_for_cwd.as_deref(), job.branch_ctx.as_deref()).await?;

        let ctx_footer = job.project_ctx.as_ref().map(|project| match &job.branch_ctx {
            Some(branch) => format!("ctx: {project} @ {branch}"),
            None => format!("ctx: {project}"),
        });

        let (placeholder_text, placeholder_entities) = takopi_telegram::render("Running…");
        let message_id = self
            .telegram
            .send(job.chat_ref.chat_id, &placeholder_text, &placeholder_entities, false)
            .await?;

        let sink = Arc::new(TelegramProgressSink::new(
            self.telegram.clone(),
            job.chat_ref.chat_id,
            message_id,
            self.delivery,
            self.final_notify,
        ));
        let presenter = Presenter::spawn(runner, sink, ctx_footer, self.clock.clone())?;

        self.scheduler.clone().submit(job, presenter, cwd).await?;
        Ok(())
    }

    async fn resolve_cwd(&self, project: Option<&str>, branch: Option<&str>) -> Result<PathBuf, BridgeError> {
        let Some(alias) = project else {
            return Ok(self.default_cwd.clone());
        };

        let project = self
            .config
            .projects
            .get(alias)
            .ok_or_else(|| BridgeError::UnknownProject(alias.to_string()))?;

        let worktrees_dir = project.worktrees_dir.clone().unwrap_or_else(|| sibling_worktrees_dir(&project.path));
        let base_branch = project.worktree_base.clone().unwrap_or_else(|| "main".to_string());

        let path = self
            .worktree
            .resolve(&project.path, &worktrees_dir, &base_branch, branch)
            .await?;
        Ok(path)
    }

    async fn reply_error(&self, chat_id: i64, message: &str) {
        let (text, entities) = takopi_telegram::render(message);
        if let Err(error) = self.telegram.send(chat_id, &text, &entities, false).await {
            tracing::warn!(%error, chat_id, "failed to deliver error reply");
        }
    }
}

fn is_cancel_command(text: &str) -> bool {
    text.trim_start().split_whitespace().next().map(|w| w == "/cancel").unwrap_or(false)
}

fn sibling_worktrees_dir(project_path: &std::path::Path) -> PathBuf {
    let name = project_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    project_path
        .parent()
        .map(|parent| parent.join(format!("{name}-worktrees")))
        .unwrap_or_else(|| PathBuf::from(format!("{name}-worktrees")))
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;

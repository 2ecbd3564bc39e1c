use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::aggregator::compute_balance_report;
use crate::config::ReportConfig;
use crate::marketplace::Marketplace;
use crate::scheduler::DailySchedule;
use crate::telegram::command::BotCommand;
use crate::telegram::{escape_html, format_report, Message, Telegram};

const POLL_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

/// Reports balances to one Telegram chat, daily and on `/balance`.
pub struct BalanceBot<M> {
    marketplace: M,
    telegram: Telegram,
    report_config: ReportConfig,
    chat_id: i64,
    schedule: DailySchedule,
    in_flight: Mutex<()>,
}

impl<M: Marketplace> BalanceBot<M> {
    pub fn new(
        marketplace: M,
        telegram: Telegram,
        report_config: ReportConfig,
        chat_id: i64,
        schedule: DailySchedule,
    ) -> Self {
        Self {
            marketplace,
            telegram,
            report_config,
            chat_id,
            schedule,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!(
            "Balance updates scheduled daily at {:02}:{:02} ({})",
            self.schedule.hour, self.schedule.minute, self.schedule.timezone
        );

        tokio::select! {
            res = self.poll_commands() => res,
            res = self.run_daily_job() => res,
        }
    }

    async fn poll_commands(&self) -> Result<()> {
        let mut offset = 0;
        loop {
            match self.telegram.get_updates(offset, POLL_TIMEOUT).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Some(message) = update.message {
                            if let Err(err) = self.handle_message(&message).await {
                                error!("Failed to handle message : {:#}", err);
                            }
                        }
                    }
                }
                Err(err) => {
                    error!("Failed to poll updates : {:#}", err);
                    tokio::time::sleep(POLL_ERROR_DELAY).await;
                }
            }
        }
    }

    async fn run_daily_job(&self) -> Result<()> {
        loop {
            let Some(wait) = self.schedule.wait_time(Utc::now()) else {
                warn!("Daily schedule never fires, disabling it");
                return std::future::pending().await;
            };
            debug!("Next scheduled balance update in {:?}", wait);
            tokio::time::sleep(wait).await;

            let _guard = self.in_flight.lock().await;
            self.send_balance().await;
        }
    }

    pub async fn handle_message(&self, message: &Message) -> Result<()> {
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let chat_id = message.chat.id;
        debug!("Command from {} : {}", chat_id, text);

        match BotCommand::parse(text) {
            BotCommand::Start => {
                self.telegram
                    .send_message(chat_id, "Starting Binance Balance Reporting Bot...")
                    .await?;
                self.telegram
                    .send_message(
                        chat_id,
                        &format!(
                            "Balance updates are scheduled to be sent daily at {:02}:{:02}:00 ({}).\n\nAlternatively, use /balance to get current balance",
                            self.schedule.hour, self.schedule.minute, self.schedule.timezone
                        ),
                    )
                    .await
            }
            BotCommand::Help => {
                self.telegram
                    .send_message(
                        chat_id,
                        "Balance updates will be sent daily. You can also use /balance to get current balance",
                    )
                    .await
            }
            BotCommand::Balance => self.check_balance(chat_id).await,
            BotCommand::Unknown(_) => Ok(()),
        }
    }

    async fn check_balance(&self, chat_id: i64) -> Result<()> {
        info!("Requesting chat ID : {}", chat_id);
        if chat_id != self.chat_id {
            warn!("Unauthorised chat ID : {}", chat_id);
            return self.telegram.send_message(chat_id, "Unauthorised!").await;
        }

        let Ok(_guard) = self.in_flight.try_lock() else {
            return self
                .telegram
                .send_message(chat_id, "A balance check is already in progress")
                .await;
        };
        self.send_balance().await;
        Ok(())
    }

    /// Computes the report and delivers it, or a failure notice.
    async fn send_balance(&self) {
        if let Err(err) = self
            .telegram
            .send_message(self.chat_id, "Checking balance...")
            .await
        {
            error!("Failed to send message : {:#}", err);
        }

        let message = match compute_balance_report(&self.marketplace, &self.report_config).await {
            Ok(report) => {
                let message = format_report(&report);
                info!("Formatted Telegram message : \n{}", message);
                message
            }
            Err(err) => {
                error!("Balance check failed : {:#}", err);
                // exchange errors may carry raw HTML error pages
                format!("Failed to check balance : {}", escape_html(&err.to_string()))
            }
        };

        if let Err(err) = self.telegram.send_message(self.chat_id, &message).await {
            error!("Failed to deliver balance : {:#}", err);
        }
    }
}

use super::ValidForm;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("could not reach the comment endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("comment endpoint answered {status}")]
    Rejected { status: reqwest::StatusCode },
    #[error("submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted,
    Failed(SubmitError),
}

/// Posts validated comments to the endpoint that stores them for moderation.
#[derive(Debug, Clone)]
pub struct CommentSubmitter {
    http: reqwest::Client,
    endpoint: String,
}

/// A submission already on its way. Dropping it does not cancel the request.
#[derive(Debug)]
pub struct PendingSubmission {
    task: tokio::task::JoinHandle<Result<(), SubmitError>>,
}

impl CommentSubmitter {
    pub fn new(http: reqwest::Client, endpoint: String) -> CommentSubmitter {
        CommentSubmitter { http, endpoint }
    }

    /// Starts the POST and returns without waiting for the response.
    pub fn dispatch(&self, form: ValidForm) -> PendingSubmission {
        let form = form.into_inner();
        let request = self.http.post(&self.endpoint).json(&form);
        let post_id = form.post_id;

        let task = tokio::spawn(async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SubmitError::Rejected { status });
            }

            tracing::info!(%post_id, "comment submitted");
            Ok(())
        });

        PendingSubmission { task }
    }
}

impl PendingSubmission {
    pub async fn outcome(self) -> SubmitOutcome {
        let result = match self.task.await {
            Ok(result) => result,
            Err(err) => Err(SubmitError::from(err)),
        };

        match result {
            Ok(()) => SubmitOutcome::Accepted,
            Err(err) => SubmitOutcome::Failed(err),
        }
    }
}

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::server::{LibrarySchema, execute};
use crate::store::SharedRepository;

const PROMPT: &str = "Enter a GraphQL query ([Enter] to confirm, [^C] to exit):";

/// Reads one query per line from `input` and writes each result to `output`
/// until `input` is exhausted.
pub async fn run<R, W>(
    schema: &LibrarySchema,
    repository: &SharedRepository,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        tracing::debug!(query, "executing console query");
        let response = execute(schema, repository, query).await;

        let data = serde_json::to_string(&response.data)?;
        output.write_all(data.as_bytes()).await?;
        output.write_all(b"\n").await?;
        for error in &response.errors {
            output
                .write_all(format!("error: {}\n", error.message).as_bytes())
                .await?;
        }
    }
    output.flush().await
}

use asana_api::{AsanaClient, AsanaConfig, TaskRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env から ASANA_PERSONAL_ACCESS_TOKEN（と任意で ASANA_BASE_URL）を読み込む
    let config = AsanaConfig::from_env()?;
    println!("Base URL: {}", config.base_url);

    let client = AsanaClient::new(config)?;

    let me = client.get_user("me").await?;
    println!("Signed in as {} ({})", me.name, me.gid);

    let (mut workspaces, _cancel) = client.list_my_workspaces()?;
    let workspace = match workspaces.next().await {
        Some(page) => page.into_result()?.into_iter().next(),
        None => None,
    };
    let Some(workspace) = workspace else {
        println!("No workspaces found");
        return Ok(());
    };
    println!("Workspace: {}", workspace.name);

    let request = TaskRequest::new().workspace(workspace.gid.clone()).limit(10);
    let (mut pages, cancel) = client.list_my_tasks(Some(request))?;

    let mut shown = 0;
    while let Some(page) = pages.next().await {
        for task in page.into_result()? {
            let due = task
                .due_on
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  [{}] {} (due {})", if task.completed { "x" } else { " " }, task.name, due);
            shown += 1;
        }
        if shown >= 30 {
            cancel.cancel();
            break;
        }
    }

    println!("Listed {} tasks", shown);
    Ok(())
}

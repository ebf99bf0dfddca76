use std::sync::Arc;

use anyhow::Context as _;
use serde_json::{Value, json};
use tokio::time::{Duration, Instant};

use phy_fake::{
    domain::{PowerState, ServerPowerStatus, Servers},
    engine::{Engine, EngineError},
    fixtures::sample_dataset,
    http::{TestServer, spawn},
    stub::StubBackend,
};

const ACTION_INTERVAL: Duration = Duration::from_millis(50);

async fn spawn_fake_server(engine: Engine) -> anyhow::Result<TestServer> {
    spawn(Arc::new(engine)).await.context("spawn fake server")
}

fn url(server: &TestServer, path: &str) -> String {
    format!("{}{path}", server.url())
}

async fn wait_for_power_state(
    client: &reqwest::Client,
    url: &str,
    expected: PowerState,
    timeout: Duration,
) -> anyhow::Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let status: ServerPowerStatus = client
            .get(url)
            .send()
            .await
            .context("get power status")?
            .error_for_status()?
            .json()
            .await
            .context("decode power status")?;
        if status.status == expected {
            return Ok(());
        }
        if Instant::now() >= deadline {
            anyhow::bail!("timeout waiting for power state {expected:?}; last={status:?}");
        }
        tokio::time::sleep(ACTION_INTERVAL / 2).await;
    }
}

#[tokio::test]
async fn serves_engine_over_http() -> anyhow::Result<()> {
    let engine = Engine::with_action_interval(sample_dataset(), ACTION_INTERVAL);
    let server = spawn_fake_server(engine).await?;
    let client = reqwest::Client::new();

    let pong = client.get(url(&server, "/ping")).send().await?.text().await?;
    assert_eq!(pong, "pong");

    let servers: Servers = client
        .get(url(&server, "/servers/"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(servers.meta.count, 2);
    assert_eq!(servers.servers[0].ports[0].port_id, 2001);

    let res = client
        .post(url(&server, "/servers/100000000001/power_control/"))
        .json(&json!({ "operation": "off" }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    wait_for_power_state(
        &client,
        &url(&server, "/servers/100000000001/power_status/"),
        PowerState::Off,
        Duration::from_secs(5),
    )
    .await?;

    let res = client
        .get(url(&server, "/servers/999999999999/"))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let problem: Value = res.json().await?;
    assert_eq!(problem["status"], 404);
    assert_eq!(problem["type"], "about:blank");

    server.shutdown().await.context("shutdown fake server")
}

#[tokio::test]
async fn bonding_then_assign_network_over_http() -> anyhow::Result<()> {
    let engine = Engine::with_action_interval(sample_dataset(), ACTION_INTERVAL);
    let server = spawn_fake_server(engine.clone()).await?;
    let client = reqwest::Client::new();

    let channel: Value = client
        .post(url(
            &server,
            "/servers/100000000002/port_channels/1002/configure_bonding/",
        ))
        .json(&json!({ "bonding_type": "lacp", "port_nicknames": ["bond0"] }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let port_id = channel["ports"][0].as_i64().context("minted port id")?;
    assert_eq!(port_id, 2003);

    let port: Value = client
        .post(url(
            &server,
            &format!("/servers/100000000002/ports/{port_id}/assign_network/"),
        ))
        .json(&json!({
            "internet_type": "common_subnet",
            "private_network_ids": ["100000000001"]
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(port["nickname"], "bond0");
    assert_eq!(port["internet"]["network_address"], "203.0.113.0");
    assert_eq!(port["global_bandwidth_mbps"], 100);
    assert_eq!(port["local_bandwidth_mbps"], 1000);

    let res = client
        .post(url(
            &server,
            &format!("/servers/100000000002/ports/{port_id}/assign_network/"),
        ))
        .json(&json!({ "private_network_ids": ["999999999999"] }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    // the engine handle shares state with the server
    let stored = engine.read_port("100000000002", port_id).await?;
    assert_eq!(stored.nickname, "bond0");
    assert!(stored.internet.is_some());

    server.shutdown().await.context("shutdown fake server")
}

#[tokio::test]
async fn serves_stub_backend_over_http() -> anyhow::Result<()> {
    let stub = StubBackend::new()
        .with_read_power_status(|_| {
            Ok(ServerPowerStatus {
                status: PowerState::Off,
            })
        })
        .with_power_control(|(server_id, _)| {
            Err(EngineError::conflict("server", server_id, "maintenance"))
        });
    let server = spawn(Arc::new(stub)).await?;
    let client = reqwest::Client::new();

    let status: ServerPowerStatus = client
        .get(url(&server, "/servers/1/power_status/"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(status.status, PowerState::Off);

    let res = client
        .post(url(&server, "/servers/1/power_control/"))
        .json(&json!({ "operation": "on" }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);

    let res = client.get(url(&server, "/servers/")).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let problem: Value = res.json().await?;
    assert!(
        problem["detail"]
            .as_str()
            .is_some_and(|d| d.contains("operation is not stubbed: list_servers"))
    );

    server.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn dropped_server_stops_accepting_requests() -> anyhow::Result<()> {
    let server = spawn_fake_server(Engine::new(sample_dataset())).await?;
    let base = server.url();
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()?;
    assert!(client.get(format!("{base}/ping")).send().await?.status().is_success());

    drop(server);
    let deadline = Instant::now() + Duration::from_secs(5);
    while client.get(format!("{base}/ping")).send().await.is_ok() {
        anyhow::ensure!(Instant::now() < deadline, "server still answering after drop");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Ok(())
}

use std::time::Duration;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::InMemoryNetworkStore;
use tokio::net::{TcpListener, TcpStream};

use server::MockServer;

async fn start_server() -> anyhow::Result<MockServer> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    Ok(MockServer::serve(listener, InMemoryNetworkStore::with_defaults())?)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

async fn get_json(c: &reqwest::Client, url: String) -> anyhow::Result<Value> {
    let res = c.get(url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_networks_on_startup() -> anyhow::Result<()> {
    let app = start_server().await?;
    let body = get_json(&client(), format!("{}/networks", app.base_url())).await?;
    assert_eq!(
        body,
        json!({"networks": ["AdColony", "Google-Mobile-Ads-SDK", "ChartboostSDK", "Applovin", "Unknown_network"]})
    );
    app.stop().await
}

#[tokio::test]
async fn e2e_plist_defaults_unknown_names_to_empty() -> anyhow::Result<()> {
    let app = start_server().await?;
    let url = format!("{}/plist?network_list=AdColony,Unknown_network,NotReal", app.base_url());
    let body = get_json(&client(), url).await?;
    assert_eq!(
        body,
        json!({
            "AdColony": ["4PFYVQ9L8R.skadnetwork", "YCLNXRL5PM.skadnetwork"],
            "Unknown_network": [],
            "NotReal": []
        })
    );
    app.stop().await
}

#[tokio::test]
async fn e2e_plist_requires_network_list() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/plist", app.base_url())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["error"].is_string());
    app.stop().await
}

#[tokio::test]
async fn e2e_set_data_round_trips() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/set_data", app.base_url()))
        .body(r#"{"X":["id1"]}"#)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"X": ["id1"]}));

    let data = get_json(&c, format!("{}/get_data", app.base_url())).await?;
    assert_eq!(data, json!({"X": ["id1"]}));
    let networks = get_json(&c, format!("{}/networks", app.base_url())).await?;
    assert_eq!(networks, json!({"networks": ["X"]}));
    app.stop().await
}

#[tokio::test]
async fn e2e_set_data_replaces_instead_of_merging() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let table = json!({
        "IronSource": ["su67r6k2v3.skadnetwork"],
        "Vungle": ["gta9lk7p23.skadnetwork", "3rd42ekr43.skadnetwork"],
        "Empty": []
    });

    let res = c.post(format!("{}/set_data", app.base_url())).json(&table).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    assert_eq!(get_json(&c, format!("{}/get_data", app.base_url())).await?, table);
    let networks = get_json(&c, format!("{}/networks", app.base_url())).await?;
    assert_eq!(networks, json!({"networks": ["IronSource", "Vungle", "Empty"]}));

    let plist = get_json(&c, format!("{}/plist?network_list=AdColony,Vungle", app.base_url())).await?;
    assert_eq!(
        plist,
        json!({"AdColony": [], "Vungle": ["gta9lk7p23.skadnetwork", "3rd42ekr43.skadnetwork"]})
    );
    app.stop().await
}

#[tokio::test]
async fn e2e_malformed_set_data_keeps_serving() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for body in ["{not json", r#"["AdColony"]"#, r#"{"X": [1]}"#] {
        let res = c.post(format!("{}/set_data", app.base_url())).body(body).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "body {body}");
    }

    let networks = get_json(&c, format!("{}/networks", app.base_url())).await?;
    assert_eq!(networks["networks"].as_array().map(Vec::len), Some(5));
    app.stop().await
}

#[tokio::test]
async fn e2e_shutdown_endpoint_closes_listener() -> anyhow::Result<()> {
    let app = start_server().await?;
    let addr = app.addr();
    let c = client();

    let res = c.get(format!("{}/shutdown", app.base_url())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Server shutting down...");
    drop(c);

    tokio::time::timeout(Duration::from_secs(5), app.wait()).await??;
    assert!(TcpStream::connect(addr).await.is_err(), "listener still accepting on {addr}");
    Ok(())
}

#[tokio::test]
async fn e2e_stop_closes_listener() -> anyhow::Result<()> {
    let app = start_server().await?;
    let addr = app.addr();
    let health = get_json(&client(), format!("{}/health", app.base_url())).await?;
    assert_eq!(health["status"], "ok");

    tokio::time::timeout(Duration::from_secs(5), app.stop()).await??;
    assert!(TcpStream::connect(addr).await.is_err());
    Ok(())
}

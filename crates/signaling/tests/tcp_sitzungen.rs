//! Ende-zu-Ende-Tests ueber echte TCP-Verbindungen

mod common;

use std::time::Duration;

use common::LaufenderServer;
use statuston_signaling::SitzungsModus;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

async fn senden(stream: &mut TcpStream, frames: &[[u8; 3]]) {
    for frame in frames {
        stream.write_all(frame).await.unwrap();
    }
    stream.flush().await.unwrap();
}

#[tokio::test]
async fn wiederholte_frames_werden_einmal_angesagt() {
    let server = LaufenderServer::starten(SitzungsModus::Seriell).await;

    let mut client = TcpStream::connect(server.adresse).await.unwrap();
    senden(&mut client, &[[30, 0, 0], [30, 0, 0]]).await;
    drop(client);

    server
        .warten_bis(|s| s.state.metriken.frames_total.get() == 2)
        .await;
    server
        .warten_bis(|s| s.state.metriken.aktive_sitzungen.get() == 0)
        .await;

    assert_eq!(server.ansager.texte(), vec!["30"]);
    assert_eq!(server.ton.aufrufe(), 0);
    server.stoppen().await;
}

#[tokio::test]
async fn geschwindigkeit_dann_mission() {
    let server = LaufenderServer::starten(SitzungsModus::Seriell).await;

    let mut client = TcpStream::connect(server.adresse).await.unwrap();
    senden(&mut client, &[[50, 0, 0], [50, 1, 0]]).await;
    drop(client);

    server
        .warten_bis(|s| s.state.metriken.frames_total.get() == 2)
        .await;
    assert_eq!(server.ansager.texte(), vec!["50", "Accepted"]);
    server.stoppen().await;
}

#[tokio::test]
async fn trennung_beim_piepen_beendet_den_takt() {
    let server = LaufenderServer::starten(SitzungsModus::Seriell).await;

    let mut client = TcpStream::connect(server.adresse).await.unwrap();
    senden(&mut client, &[[20, 0, 10]]).await;
    server.warten_bis(|s| s.ton.aufrufe() >= 2).await;
    drop(client);

    server
        .warten_bis(|s| s.state.metriken.aktive_sitzungen.get() == 0)
        .await;
    let nach_ende = server.ton.aufrufe();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(server.ton.aufrufe(), nach_ende);
    server.stoppen().await;
}

#[tokio::test]
async fn seriell_bedient_clients_nacheinander_mit_frischem_zustand() {
    let server = LaufenderServer::starten(SitzungsModus::Seriell).await;

    for _ in 0..2 {
        let mut client = TcpStream::connect(server.adresse).await.unwrap();
        senden(&mut client, &[[40, 0, 0]]).await;
        drop(client);
    }

    server
        .warten_bis(|s| s.state.metriken.frames_total.get() == 2)
        .await;
    // Jede Sitzung beginnt ohne Vorgaenger-Frame
    assert_eq!(server.ansager.texte(), vec!["40", "40"]);
    server.stoppen().await;
}

#[tokio::test]
async fn parallel_haelt_mehrere_sitzungen_gleichzeitig() {
    let server = LaufenderServer::starten(SitzungsModus::Parallel).await;

    let mut a = TcpStream::connect(server.adresse).await.unwrap();
    let mut b = TcpStream::connect(server.adresse).await.unwrap();
    senden(&mut a, &[[10, 0, 0]]).await;
    senden(&mut b, &[[0, 0, 0]]).await;

    server
        .warten_bis(|s| s.state.metriken.aktive_sitzungen.get() == 2)
        .await;
    server
        .warten_bis(|s| s.state.metriken.frames_total.get() == 2)
        .await;

    let mut texte = server.ansager.texte();
    texte.sort();
    assert_eq!(texte, vec!["10", "Stop"]);

    drop(a);
    drop(b);
    server
        .warten_bis(|s| s.state.metriken.aktive_sitzungen.get() == 0)
        .await;
    server.stoppen().await;
}

#[tokio::test]
async fn shutdown_beendet_offene_parallele_sitzungen() {
    let server = LaufenderServer::starten(SitzungsModus::Parallel).await;

    let mut client = TcpStream::connect(server.adresse).await.unwrap();
    senden(&mut client, &[[60, 0, 4]]).await;
    server
        .warten_bis(|s| s.state.metriken.aktive_sitzungen.get() == 1)
        .await;

    let state = server.state.clone();
    server.stoppen().await;
    assert_eq!(state.metriken.aktive_sitzungen.get(), 0);
    drop(client);
}

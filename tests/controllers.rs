//! Controller integration tests using wiremock
//!
//! These tests drive the list and form controllers against a mocked
//! catalog backend and count the requests each workflow issues.

use mediadesk::api::CatalogClient;
use mediadesk::app::{App, Task};
use mediadesk::config::Config;
use mediadesk::controller::{FormState, ListController, LoadState};
use mediadesk::resource::get_resource;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&format!("{}/api/", server.uri())).expect("valid base URL")
}

async fn mount_list(server: &MockServer, collection: &str, items: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", collection)))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .expect(times)
        .mount(server)
        .await;
}

fn directors() -> Value {
    json!([
        {"_id": "d1", "nombres": "Christopher Nolan", "estado": "Activo"},
        {"_id": "d2", "nombres": "Sofia Coppola", "estado": "Inactivo"}
    ])
}

/// Test module for the list workflow
mod list_tests {
    use super::*;

    /// Test a successful create issues one POST and exactly one reload
    #[tokio::test]
    async fn test_create_reloads_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/directores"))
            .and(body_json(json!({"nombres": "Greta Gerwig", "estado": "Activo"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "d3"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "directores", directors(), 1).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("directores").unwrap(), false);

        assert!(list.open_new(&api).await);
        list.form_mut().unwrap().set_field("nombres", "Greta Gerwig");
        assert!(list.submit_form(&api).await);

        assert!(list.form().is_none());
        assert_eq!(list.state(), &LoadState::Ready);
        assert_eq!(list.items().len(), 2);
    }

    /// Test a second form cannot be opened while one is open
    #[tokio::test]
    async fn test_single_form_at_a_time() {
        let server = MockServer::start().await;
        let api = client_for(&server);
        let mut list = ListController::new(get_resource("tipos").unwrap(), false);

        assert!(list.open_new(&api).await);
        assert!(!list.open_new(&api).await);
    }

    /// Test a successful delete triggers one reload
    #[tokio::test]
    async fn test_delete_reloads() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/directores/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        // Initial load plus the reload after delete
        mount_list(&server, "directores", directors(), 2).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("directores").unwrap(), false);
        list.refresh(&api).await;

        assert!(list.delete(&api, "d1").await);
        assert_eq!(list.state(), &LoadState::Ready);
    }

    /// Test a failed delete keeps the collection and shows the entity message
    #[tokio::test]
    async fn test_failed_delete_keeps_items() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/directores/d1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "directores", directors(), 1).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("directores").unwrap(), false);
        list.refresh(&api).await;

        assert!(!list.delete(&api, "d1").await);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.error(), Some("Error al eliminar el director"));
    }

    /// Test a failed load keeps the previous records
    #[tokio::test]
    async fn test_failed_reload_keeps_previous_items() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/generos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "g1", "nombre": "Drama"}
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/generos"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("generos").unwrap(), false);
        list.refresh(&api).await;
        list.refresh(&api).await;

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.error(), Some("Error al cargar los géneros"));
    }
}

/// Test module for the form workflow
mod form_tests {
    use super::*;

    async fn mount_lookups(server: &MockServer) {
        mount_list(
            server,
            "generos",
            json!([{"_id": "g1", "nombre": "Drama", "estado": "Activo"}]),
            1,
        )
        .await;
        mount_list(server, "directores", directors(), 1).await;
        mount_list(
            server,
            "productoras",
            json!([{"_id": "p1", "nombre": "A24", "estado": "Activo"}]),
            1,
        )
        .await;
        mount_list(
            server,
            "tipos",
            json!([{"_id": "t1", "nombre": "Película", "estado": "Activo"}]),
            1,
        )
        .await;
    }

    /// Test the media form loads all four option lists once each and
    /// offers only active directors
    #[tokio::test]
    async fn test_media_form_loads_lookups() {
        let server = MockServer::start().await;
        mount_lookups(&server).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("media").unwrap(), false);
        assert!(list.open_new(&api).await);

        let form = list.form().unwrap();
        let directors: Vec<&str> = form
            .options("director")
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(directors, vec!["Christopher Nolan"]);
        assert_eq!(form.options("genero").len(), 1);
        assert_eq!(form.options("productora").len(), 1);
        assert_eq!(form.options("tipo").len(), 1);
    }

    /// Test one failing lookup leaves every selector empty
    #[tokio::test]
    async fn test_failed_lookup_clears_options() {
        let server = MockServer::start().await;
        mount_list(&server, "generos", json!([{"_id": "g1", "nombre": "Drama"}]), 1).await;
        mount_list(&server, "directores", directors(), 1).await;
        mount_list(&server, "productoras", json!([{"_id": "p1", "nombre": "A24"}]), 1).await;
        Mock::given(method("GET"))
            .and(path("/api/tipos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("media").unwrap(), false);
        assert!(list.open_new(&api).await);

        let form = list.form().unwrap();
        assert!(form.options("genero").is_empty());
        assert!(form.options("director").is_empty());
    }

    /// Test editing a record and saving unchanged sends back the same values,
    /// with embedded references flattened to ids
    #[tokio::test]
    async fn test_unchanged_edit_round_trips() {
        let server = MockServer::start().await;
        mount_lookups(&server).await;

        let record = json!({
            "_id": "m1",
            "serial": "SER-001",
            "titulo": "Oppenheimer",
            "sinopsis": "Biografía",
            "url_pelicula": "https://example.com/oppenheimer",
            "imagen_portada": "",
            "anio_estreno": 2023,
            "genero": {"_id": "g1", "nombre": "Drama"},
            "director": {"_id": "d1", "nombres": "Christopher Nolan"},
            "productora": {"_id": "p1", "nombre": "A24"},
            "tipo": {"_id": "t1", "nombre": "Película"},
            "fecha_creacion": "2024-01-15T10:00:00.000Z"
        });

        Mock::given(method("PUT"))
            .and(path("/api/media/m1"))
            .and(body_json(json!({
                "serial": "SER-001",
                "titulo": "Oppenheimer",
                "sinopsis": "Biografía",
                "url_pelicula": "https://example.com/oppenheimer",
                "imagen_portada": "",
                "anio_estreno": 2023,
                "genero": "g1",
                "director": "d1",
                "productora": "p1",
                "tipo": "t1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "m1"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "media", json!([record.clone()]), 1).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("media").unwrap(), false);
        assert!(list.open_edit(&api, &record).await);
        assert_eq!(list.form().unwrap().selected_label("director"), Some("Christopher Nolan"));
        assert!(list.submit_form(&api).await);
    }

    /// Test a form failing validation never reaches the backend
    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generos"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("generos").unwrap(), false);
        assert!(list.open_new(&api).await);

        let form = list.form_mut().unwrap();
        form.set_field("nombre", "D");
        form.set_field("descripcion", "corta");
        assert!(!list.submit_form(&api).await);

        let form = list.form().unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(
            form.error("nombre"),
            Some("El nombre debe tener al menos 2 caracteres")
        );
        assert_eq!(
            form.error("descripcion"),
            Some("La descripción debe tener al menos 10 caracteres")
        );
    }

    /// Test a rejected create keeps the form open with the entity message
    #[tokio::test]
    async fn test_rejected_create_keeps_form_open() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/tipos"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "tipos", json!([]), 0).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("tipos").unwrap(), false);
        assert!(list.open_new(&api).await);

        let form = list.form_mut().unwrap();
        form.set_field("nombre", "Serie");
        form.set_field("descripcion", "Producción por episodios");
        assert!(!list.submit_form(&api).await);

        let form = list.form().unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.submit_error(), Some("Error al crear el tipo"));
    }

    /// Test cancelling a form still reloads the collection
    #[tokio::test]
    async fn test_cancel_reloads() {
        let server = MockServer::start().await;
        mount_list(&server, "productoras", json!([]), 1).await;

        let api = client_for(&server);
        let mut list = ListController::new(get_resource("productoras").unwrap(), false);
        assert!(list.open_new(&api).await);
        list.form_mut().unwrap().cancel();
        list.close_form(&api).await;

        assert!(list.form().is_none());
        assert_eq!(list.state(), &LoadState::Ready);
    }
}

/// Test module for the dashboard counts
mod stats_tests {
    use super::*;
    use mediadesk::stats::fetch_active_counts;

    /// Test counts include only active records and a failed collection is zero
    #[tokio::test]
    async fn test_active_counts() {
        let server = MockServer::start().await;
        mount_list(&server, "directores", directors(), 1).await;
        mount_list(
            &server,
            "generos",
            json!([{"_id": "g1", "nombre": "Drama"}, {"_id": "g2", "nombre": "Terror"}]),
            1,
        )
        .await;
        mount_list(&server, "productoras", json!([]), 1).await;
        mount_list(&server, "media", json!([{"_id": "m1", "titulo": "Aftersun"}]), 1).await;
        Mock::given(method("GET"))
            .and(path("/api/tipos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let counts: Vec<(String, usize)> = fetch_active_counts(&api, None)
            .await
            .into_iter()
            .map(|c| (c.key, c.active))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("media".to_string(), 1),
                ("directores".to_string(), 1),
                ("generos".to_string(), 2),
                ("productoras".to_string(), 0),
                ("tipos".to_string(), 0),
            ]
        );
    }

    /// Test a collection already in memory is counted without being fetched
    #[tokio::test]
    async fn test_loaded_collection_not_refetched() {
        let server = MockServer::start().await;
        mount_list(&server, "directores", directors(), 0).await;
        for collection in ["media", "generos", "productoras", "tipos"] {
            mount_list(&server, collection, json!([]), 1).await;
        }

        let api = client_for(&server);
        let items = vec![
            json!({"_id": "d1", "estado": "Activo"}),
            json!({"_id": "d2", "estado": "Activo"}),
            json!({"_id": "d3", "estado": "Inactivo"}),
        ];
        let counts = fetch_active_counts(&api, Some(("directores", items.as_slice()))).await;

        let directores = counts.iter().find(|c| c.key == "directores").unwrap();
        assert_eq!(directores.active, 2);
    }
}

/// Test module for the app task loop
mod app_tests {
    use super::*;

    async fn mount_other_collections(server: &MockServer) {
        for collection in ["media", "generos", "productoras", "tipos"] {
            mount_list(server, collection, json!([]), 1).await;
        }
    }

    fn directors_app(server: &MockServer) -> App {
        let list = ListController::new(get_resource("directores").unwrap(), false);
        App::from_initialized(client_for(server), list, Vec::new(), Config::default(), false)
    }

    /// Test a delete reloads the current collection exactly once, counts included
    #[tokio::test]
    async fn test_delete_lists_current_collection_once() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/directores/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "d1"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "directores", directors(), 1).await;
        mount_other_collections(&server).await;

        let mut app = directors_app(&server);
        app.queue(Task::Delete("d1".to_string()));
        app.run_pending_task().await;

        assert!(!app.is_busy());
        assert_eq!(app.list.state(), &LoadState::Ready);
        let directores = app.stats.iter().find(|c| c.key == "directores").unwrap();
        assert_eq!(directores.active, 1);
    }

    /// Test a create reloads the current collection exactly once, counts included
    #[tokio::test]
    async fn test_create_lists_current_collection_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/directores"))
            .and(body_json(json!({"nombres": "Greta Gerwig", "estado": "Activo"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "d3"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, "directores", directors(), 1).await;
        mount_other_collections(&server).await;

        let mut app = directors_app(&server);
        app.queue(Task::OpenForm(None));
        app.run_pending_task().await;
        app.list.form_mut().unwrap().set_field("nombres", "Greta Gerwig");
        app.submit_form();
        assert!(app.is_busy());
        app.run_pending_task().await;

        assert!(app.list.form().is_none());
        assert_eq!(app.list.items().len(), 2);
        assert_eq!(app.stats.len(), 5);
    }
}

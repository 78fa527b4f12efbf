// ==========================================
// 配置集成测试
// ==========================================
// 测试范围:
// 1. config_kv 读写 / 删除 / 快照
// 2. AppState 装配时的配置优先级（命令行 > config_kv > 默认值）
// 3. 无效配置降级为默认值或仅本地估算
// ==========================================


use eco_lca_pro::app::{AppOptions, AppState};
use eco_lca_pro::config::app_config::{DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS};
use eco_lca_pro::config::{config_keys, ConfigManager};
use test_helpers::create_test_db;

#[test]
fn test_config_kv_roundtrip_配置读写() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let manager = ConfigManager::new(&db_path).unwrap();

    assert_eq!(manager.get_global_config_value(config_keys::API_BASE_URL).unwrap(), None);

    manager
        .set_global_config_value(config_keys::API_BASE_URL, "http://lca.internal:8080/api")
        .unwrap();
    manager
        .set_global_config_value(config_keys::API_BASE_URL, "http://lca.internal:9090/api")
        .unwrap();
    assert_eq!(
        manager.get_api_base_url().unwrap(),
        "http://lca.internal:9090/api"
    );

    let snapshot = manager.get_config_snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);

    assert!(manager.remove_global_config_value(config_keys::API_BASE_URL).unwrap());
    assert!(!manager.remove_global_config_value(config_keys::API_BASE_URL).unwrap());
    assert_eq!(manager.get_api_base_url().unwrap(), DEFAULT_API_BASE_URL);
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager.set_global_config_value(config_keys::API_TIMEOUT_SECS, "soon").unwrap();
    manager.set_global_config_value(config_keys::REMOTE_ENABLED, "maybe").unwrap();
    manager.set_global_config_value(config_keys::UI_LOCALE, "fr").unwrap();

    let config = manager.load_app_config().unwrap();
    assert_eq!(config.api.timeout_secs, DEFAULT_API_TIMEOUT_SECS);
    assert!(config.remote_enabled);
    assert_eq!(config.locale, "en");
}

#[test]
fn test_app_state_reads_stored_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    {
        let manager = ConfigManager::new(&db_path).unwrap();
        manager.set_global_config_value(config_keys::UI_LOCALE, "zh-CN").unwrap();
        manager.set_global_config_value(config_keys::API_TIMEOUT_SECS, "5").unwrap();
    }

    let state = AppState::new(db_path.clone()).expect("AppState 初始化失败");
    assert_eq!(state.config.locale, "zh-CN");
    assert_eq!(state.config.api.timeout_secs, 5);
    assert_eq!(state.get_db_path(), db_path);
    assert!(state.lca_client.is_some());
}

#[test]
fn test_command_line_overrides_win_命令行优先() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value(config_keys::API_BASE_URL, "http://stored:5000/api")
        .unwrap();

    let state = AppState::with_options(
        db_path.clone(),
        AppOptions {
            api_url: Some("http://override:6000/api".to_string()),
            locale: Some("zh-CN".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(state.config.api.base_url, "http://override:6000/api");
    assert_eq!(state.config.locale, "zh-CN");
    let client = state.lca_client.as_ref().unwrap();
    assert_eq!(client.settings().base_url, "http://override:6000/api");

    let offline = AppState::with_options(
        db_path,
        AppOptions {
            offline: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!offline.config.remote_enabled);
    assert!(offline.lca_client.is_none());
    assert!(!offline.strategy.has_remote());
}

#[tokio::test]
async fn test_invalid_base_url_degrades_to_local_estimates() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::with_options(
        db_path,
        AppOptions {
            api_url: Some("ftp://lca.example".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(state.lca_client.is_none());
    assert!(!state.strategy.has_remote());

    let outcome = state.assessment_api.apply_template_and_submit().await.unwrap();
    assert!(outcome.results().unwrap().using_mock_data);
}

#[test]
fn test_missing_database_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let bad_path = dir.path().join("missing").join("nested").join("lca.db");
    let result = AppState::new(bad_path.to_string_lossy().to_string());
    assert!(result.is_err());
}

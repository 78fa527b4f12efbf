// ==========================================
// 分步录入流程集成测试
// ==========================================
// 测试范围:
// 1. 九步完整录入 → 提交 → 缓存
// 2. 校验失败时停留在当前步骤
// 3. 跳转规则（向后无条件，向前只校验当前步骤）
// 4. 编辑字段清除对应错误
// ==========================================


use std::sync::Arc;

use eco_lca_pro::api::{ApiError, AssessmentApi};
use eco_lca_pro::domain::assessment::fields;
use eco_lca_pro::domain::{AssessmentPatch, AssessmentStep, MetalType};
use eco_lca_pro::engine::EstimationStrategy;
use eco_lca_pro::logging;
use eco_lca_pro::repository::{InMemoryResultStore, ResultStore};
use serde_json::json;

fn new_api() -> (AssessmentApi, Arc<InMemoryResultStore>) {
    let store = Arc::new(InMemoryResultStore::new());
    let api = AssessmentApi::new(EstimationStrategy::local_only(), store.clone());
    (api, store)
}

fn patch(value: serde_json::Value) -> AssessmentPatch {
    serde_json::from_value(value).expect("patch JSON 无法解析")
}

#[tokio::test]
async fn test_complete_walk_through_all_steps_完整录入() {
    logging::init_test();
    let (api, store) = new_api();

    let steps = [
        json!({"metalType": "copper"}),
        json!({"processRoute": "smelting"}),
        json!({"productionScale": "200"}),
        json!({"totalInputs": 250, "totalOutputs": 200}),
        json!({"scrapRatio": 10, "recyclingRate": 40, "energyRecoveryRate": 20}),
        json!({"recycledContent": 30}),
        json!({"energySource": "grid"}),
        json!({"transportMode": "rail", "transportDistance": "continental"}),
    ];

    for (index, answers) in steps.into_iter().enumerate() {
        let snapshot = api.update(patch(answers)).expect("update 失败");
        assert_eq!(snapshot.step_number as usize, index + 1);
        assert!(snapshot.can_proceed, "第{}步应可前进", index + 1);

        let snapshot = api.next().expect("next 失败");
        assert_eq!(snapshot.step_number as usize, index + 2);
    }

    api.update(patch(json!({"endOfLifeScenario": "recycling", "recoveryRate": "medium"})))
        .unwrap();
    let snapshot = api.snapshot().unwrap();
    assert_eq!(snapshot.current_step, AssessmentStep::EndOfLife);
    assert_eq!(snapshot.progress_percent, 100);
    // 投入 250 / 产出 200 派生材料效率
    let efficiency = snapshot.data.material_efficiency.expect("材料效率应被派生");
    assert!((efficiency - 80.0).abs() < 1e-9);

    let outcome = api.submit().await.expect("提交失败");
    let results = outcome.results().expect("应产生结果");
    assert!(results.using_mock_data);
    assert!(!results.template_used);
    assert_eq!(results.input_data.metal_type, Some(MetalType::Copper));
    assert!((results.carbon_footprint - 212.54).abs() < 1e-9);

    let cached = store.load().unwrap().expect("缓存中应有结果");
    assert_eq!(cached.assessment_id, results.assessment_id);
}

#[test]
fn test_validation_failure_keeps_position_校验失败() {
    logging::init_test();
    let (api, _store) = new_api();
    api.update(patch(json!({"metalType": "steel"}))).unwrap();
    api.next().unwrap();
    api.update(patch(json!({"processRoute": "recycling"}))).unwrap();
    api.next().unwrap();

    // 步骤3: 0 不是合法规模
    api.update(patch(json!({"productionScale": 0}))).unwrap();
    match api.next() {
        Err(ApiError::Validation { step, errors }) => {
            assert_eq!(step, AssessmentStep::ProductionScale);
            assert!(errors.contains(fields::PRODUCTION_SCALE));
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
    let snapshot = api.snapshot().unwrap();
    assert_eq!(snapshot.step_number, 3);
    assert!(!snapshot.errors.is_empty());

    // 编辑该字段后错误被清除
    let snapshot = api.update(patch(json!({"productionScale": 50}))).unwrap();
    assert!(!snapshot.errors.contains(fields::PRODUCTION_SCALE));
    assert_eq!(api.next().unwrap().step_number, 4);
}

#[test]
fn test_optional_waste_step_passes_with_slider_defaults() {
    logging::init_test();
    let (api, _store) = new_api();
    api.update(patch(json!({
        "metalType": "zinc",
        "processRoute": "hydrometallurgy",
        "productionScale": 10,
        "totalInputs": 12,
        "totalOutputs": 10
    })))
    .unwrap();
    api.jump_to(5).unwrap();

    // 滑块默认值为 0，步骤5与步骤6都能直接通过
    assert_eq!(api.next().unwrap().step_number, 6);
    assert_eq!(api.next().unwrap().step_number, 7);

    // 步骤7没有默认值
    assert!(matches!(api.next(), Err(ApiError::Validation { .. })));
}

#[test]
fn test_jump_rules_跳转规则() {
    logging::init_test();
    let (api, _store) = new_api();

    // 当前步骤未完成时不能向前跳
    assert!(matches!(api.jump_to(4), Err(ApiError::Validation { .. })));
    assert_eq!(api.snapshot().unwrap().step_number, 1);

    // 当前步骤完成后可以直接跳到最后一步（中间步骤不校验）
    api.update(patch(json!({"metalType": "nickel"}))).unwrap();
    let snapshot = api.jump_to(9).unwrap();
    assert_eq!(snapshot.step_number, 9);
    assert_eq!(snapshot.data.production_scale, None);

    // 向后跳转无条件
    let snapshot = api.jump_to(2).unwrap();
    assert_eq!(snapshot.step_number, 2);
    assert_eq!(api.previous().unwrap().step_number, 1);
    assert_eq!(api.previous().unwrap().step_number, 1);
}

#[tokio::test]
async fn test_submit_only_validates_final_step() {
    logging::init_test();
    let (api, store) = new_api();
    api.update(patch(json!({"metalType": "lithium"}))).unwrap();
    api.jump_to(9).unwrap();

    // 最后一步缺少必填项
    match api.submit().await {
        Err(ApiError::Validation { step, errors }) => {
            assert_eq!(step, AssessmentStep::EndOfLife);
            assert!(errors.contains(fields::END_OF_LIFE_SCENARIO));
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
    assert!(store.load().unwrap().is_none());

    // 填埋不需要回收率
    api.update(patch(json!({"endOfLifeScenario": "landfill"}))).unwrap();
    let outcome = api.submit().await.expect("提交失败");
    let results = outcome.results().unwrap();
    // 规模缺失按 0 计算
    assert_eq!(results.carbon_footprint, 0.0);
    assert_eq!(results.energy_consumption, 0.0);
}

#[test]
fn test_out_of_range_values_are_clamped() {
    logging::init_test();
    let (api, _store) = new_api();
    let snapshot = api
        .update(patch(json!({"recycledContent": 140, "scrapRatio": -5, "totalInputs": -20})))
        .unwrap();
    assert_eq!(snapshot.data.recycled_content, Some(100.0));
    assert_eq!(snapshot.data.scrap_ratio, Some(0.0));
    assert_eq!(snapshot.data.total_inputs, Some(0.0));
}

#[tokio::test]
async fn test_non_finite_scale_never_reaches_cache_无穷规模() {
    logging::init_test();
    let (api, store) = new_api();

    // 表单 JSON 中的 "inf" 直接被拒绝
    let raw = serde_json::from_value::<AssessmentPatch>(json!({"productionScale": "inf"}));
    assert!(raw.is_err());

    api.update(AssessmentPatch::from(eco_lca_pro::domain::AssessmentInput::demo_template()))
        .unwrap();
    api.update(AssessmentPatch {
        production_scale: Some(f64::INFINITY),
        ..Default::default()
    })
    .unwrap();
    api.jump_to(3).unwrap();
    match api.next() {
        Err(ApiError::Validation { step, errors }) => {
            assert_eq!(step, AssessmentStep::ProductionScale);
            assert!(errors.contains(fields::PRODUCTION_SCALE));
        }
        other => panic!("Expected Validation, got {:?}", other),
    }

    // 退回第2步后越过第3步直接提交，缓存仍可读回
    api.previous().unwrap();
    api.jump_to(9).unwrap();
    api.submit().await.expect("提交失败");
    let cached = store.load().unwrap().expect("缓存为空");
    assert_eq!(cached.input_data.production_scale, None);
    assert!(cached.carbon_footprint.is_finite());
    let blob = serde_json::to_string(&cached).unwrap();
    assert!(serde_json::from_str::<eco_lca_pro::domain::AssessmentResults>(&blob).is_ok());
}

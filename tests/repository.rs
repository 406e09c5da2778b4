use chrono::NaiveDate;
use loteamento::domain::delinquency::{STATUS_OVERDUE, STATUS_REGULAR};
use loteamento::domain::installment::InstallmentStatus;
use loteamento::domain::price_adjustment::AdjustmentStatus;
use loteamento::repository::errors::RepositoryError;
use loteamento::repository::{
    ClientReader, ContractReader, DelinquencyReader, PriceAdjustmentReader, PriceAdjustmentWriter,
};
use loteamento::services::price_adjustments::StatusClock;
use loteamento::services::{
    PageRequest, ServiceError, clients, communications, contracts, delinquency, invoices, lots,
    price_adjustments, triggers, users,
};
use serde_json::json;

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn page() -> PageRequest {
    PageRequest::new(None, None)
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = test_db.repo();

    let alice = clients::create_client(
        &repo,
        json!({"nome": "Alice", "email": "alice@example.com", "cidade": "Campinas"}),
    )
    .unwrap();
    let bob = clients::create_client(&repo, json!({"nome": "Bob", "telefone": "(11) 98765-4321"}))
        .unwrap();

    let all = clients::list_clients(&repo, None, page()).unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].nome.as_str(), "Alice");

    let found = clients::list_clients(&repo, Some("camp".into()), page()).unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].id, alice.id);

    let updated = clients::update_client(&repo, bob.id.get(), json!({"nome": "Bobby"})).unwrap();
    assert_eq!(updated.nome.as_str(), "Bobby");
    assert_eq!(
        updated.telefone.map(|p| p.as_str().to_string()),
        Some("+5511987654321".to_string())
    );

    clients::delete_client(&repo, alice.id.get()).unwrap();
    assert!(repo.get_client_by_id(alice.id).unwrap().is_none());
    assert!(matches!(
        clients::delete_client(&repo, alice.id.get()),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn test_client_import_is_all_or_nothing() {
    let test_db = common::TestDb::new("test_client_import_is_all_or_nothing.db");
    let repo = test_db.repo();

    let rejected = clients::import_clients(
        &repo,
        vec![json!({"nome": "Carla"}), json!({"email": "sem-nome@example.com"})],
    );
    assert!(matches!(rejected, Err(ServiceError::Validation(_))));
    assert_eq!(repo.count_clients().unwrap(), 0);

    let imported = clients::import_clients(
        &repo,
        vec![json!({"nome": "Carla"}), json!({"nome": "Davi", "area": 300})],
    )
    .unwrap();
    assert_eq!(imported, 2);
    assert_eq!(repo.count_clients().unwrap(), 2);
}

#[test]
fn test_contract_schedule_payment_and_delinquency() {
    let test_db = common::TestDb::new("test_contract_schedule_payment_and_delinquency.db");
    let repo = test_db.repo();

    let client = clients::create_client(&repo, json!({"nome": "Maria"})).unwrap();
    let lot = lots::create_lot(
        &repo,
        json!({"numero": "7", "quadra": "C", "area": 360, "valor": 12000}),
    )
    .unwrap();

    let detail = contracts::create_contract(
        &repo,
        json!({
            "clientId": client.id.get(),
            "lotId": lot.id.get(),
            "valorTotal": 12000,
            "quantidadeParcelas": 12,
            "dataInicio": "2025-01-10",
            "indiceReajuste": "IGPM",
        }),
    )
    .unwrap();
    assert_eq!(detail.parcelas.len(), 12);
    assert_eq!(detail.parcelas[0].data_vencimento, date(2025, 1, 10));
    assert_eq!(detail.parcelas[11].data_vencimento, date(2025, 12, 10));
    assert!(detail.parcelas.iter().all(|p| p.valor == 1000.0));

    let today = date(2025, 3, 15);
    let snapshot = delinquency::compute_client_delinquency(&repo, client.id.get(), today).unwrap();
    assert_eq!(snapshot.status, STATUS_OVERDUE);
    assert_eq!(snapshot.parcelas.len(), 3);
    assert_eq!(snapshot.valor_em_aberto, 3000.0);
    assert_eq!(snapshot.dias_atraso, 64);

    let first = detail.parcelas[0].id.get();
    let paid =
        contracts::pay_installment(&repo, first, json!({"dataPagamento": "2025-01-10"}), today)
            .unwrap();
    assert_eq!(paid.status, InstallmentStatus::Paid);
    assert_eq!(paid.data_pagamento, Some(date(2025, 1, 10)));
    assert!(matches!(
        contracts::pay_installment(&repo, first, json!({}), today),
        Err(ServiceError::Conflict(_))
    ));

    let record = delinquency::refresh_client_delinquency(&repo, client.id.get(), today).unwrap();
    assert_eq!(record.valor_em_aberto, 2000.0);
    assert_eq!(record.dias_atraso, 33);
    assert_eq!(record.parcelas.len(), 2);

    let stored = repo.get_delinquency_by_client(client.id).unwrap().unwrap();
    assert_eq!(stored.id, record.id);

    let contacted = communications::create_communication(
        &repo,
        json!({
            "clientId": client.id.get(),
            "canal": "whatsapp",
            "mensagem": "Lembrete de pagamento",
            "enviadoEm": "2025-03-16T10:00:00",
        }),
        date(2025, 3, 16).and_hms_opt(12, 0, 0).unwrap(),
    )
    .unwrap();
    let stored = repo.get_delinquency_by_client(client.id).unwrap().unwrap();
    assert_eq!(stored.ultimo_contato, Some(contacted.enviado_em));

    for installment in &detail.parcelas[1..] {
        contracts::pay_installment(&repo, installment.id.get(), json!({}), today).unwrap();
    }
    let report = delinquency::refresh_all(&repo, today).unwrap();
    assert_eq!(report.atualizados.len(), 1);
    assert_eq!(report.atualizados[0].status, STATUS_REGULAR);
    assert_eq!(report.atualizados[0].valor_em_aberto, 0.0);
    assert_eq!(report.atualizados[0].ultimo_contato, Some(contacted.enviado_em));
}

#[test]
fn test_applying_adjustment_rescales_open_installments() {
    let test_db = common::TestDb::new("test_applying_adjustment_rescales_open_installments.db");
    let repo = test_db.repo();

    let client = clients::create_client(&repo, json!({"nome": "Joana"})).unwrap();
    let lot = lots::create_lot(
        &repo,
        json!({"numero": "1", "quadra": "A", "area": 250, "valor": 12000}),
    )
    .unwrap();
    let detail = contracts::create_contract(
        &repo,
        json!({
            "clientId": client.id.get(),
            "lotId": lot.id.get(),
            "valorTotal": 12000,
            "quantidadeParcelas": 12,
            "dataInicio": "2025-01-10",
            "indiceReajuste": "IPCA",
        }),
    )
    .unwrap();

    let clock = StatusClock::new(date(2025, 3, 15), 30);
    let view = price_adjustments::create_price_adjustment(
        &repo,
        json!({
            "contractId": detail.contract.id.get(),
            "parcelaReferencia": 7,
            "valorOriginal": 1000,
            "indiceAplicado": 4.5,
            "indiceNome": "IPCA",
            "percentualAdicional": 0.5,
            "dataReferencia": "2025-07-10",
        }),
        clock,
    )
    .unwrap();
    assert_eq!(view.adjustment.reajuste_total, 5.0);
    assert_eq!(view.adjustment.valor_reajustado, 1050.0);
    assert_eq!(view.status_atual, AdjustmentStatus::Pending);

    let later = StatusClock::new(date(2025, 6, 20), 30);
    let listed = price_adjustments::list_price_adjustments(
        &repo,
        Some(detail.contract.id.get()),
        page(),
        later,
    )
    .unwrap();
    assert_eq!(listed.items[0].status_atual, AdjustmentStatus::Imminent);

    let applied_on = StatusClock::new(date(2025, 7, 12), 30);
    let applied =
        price_adjustments::apply_price_adjustment(&repo, view.adjustment.id.get(), applied_on)
            .unwrap();
    assert_eq!(applied.parcelas_atualizadas, 6);
    assert!(applied.reajuste.adjustment.aplicado);
    assert_eq!(applied.reajuste.adjustment.data_aplicacao, Some(date(2025, 7, 12)));
    assert_eq!(applied.reajuste.status_atual, AdjustmentStatus::Applied);

    let installments = repo.list_installments(detail.contract.id).unwrap();
    assert_eq!(installments[5].valor_corrigido, 1000.0);
    assert!(installments[6..].iter().all(|p| p.valor_corrigido == 1050.0));
    assert!(installments.iter().all(|p| p.valor == 1000.0));

    assert!(matches!(
        price_adjustments::apply_price_adjustment(&repo, view.adjustment.id.get(), applied_on),
        Err(ServiceError::Conflict(_))
    ));
}

#[test]
fn test_stale_apply_does_not_rescale_twice() {
    let test_db = common::TestDb::new("test_stale_apply_does_not_rescale_twice.db");
    let repo = test_db.repo();

    let client = clients::create_client(&repo, json!({"nome": "Rita"})).unwrap();
    let lot = lots::create_lot(
        &repo,
        json!({"numero": "2", "quadra": "B", "area": 250, "valor": 12000}),
    )
    .unwrap();
    let detail = contracts::create_contract(
        &repo,
        json!({
            "clientId": client.id.get(),
            "lotId": lot.id.get(),
            "valorTotal": 12000,
            "quantidadeParcelas": 12,
            "dataInicio": "2025-01-10",
            "indiceReajuste": "IPCA",
        }),
    )
    .unwrap();
    let view = price_adjustments::create_price_adjustment(
        &repo,
        json!({
            "contractId": detail.contract.id.get(),
            "parcelaReferencia": 7,
            "valorOriginal": 1000,
            "indiceAplicado": 4.5,
            "indiceNome": "IPCA",
            "percentualAdicional": 0.5,
            "dataReferencia": "2025-07-10",
        }),
        StatusClock::new(date(2025, 3, 15), 30),
    )
    .unwrap();

    // Both callers read the record before either one applies it.
    let mut stale = repo
        .get_price_adjustment_by_id(view.adjustment.id)
        .unwrap()
        .unwrap();
    stale.aplicado = true;
    stale.status = AdjustmentStatus::Applied;
    stale.data_aplicacao = Some(date(2025, 7, 12));

    let (_, touched) = repo.apply_price_adjustment(&stale).unwrap();
    assert_eq!(touched, 6);
    assert!(matches!(
        repo.apply_price_adjustment(&stale),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let installments = repo.list_installments(detail.contract.id).unwrap();
    assert_eq!(installments[6].valor_corrigido, 1050.0);
    assert!(installments[6..].iter().all(|p| p.valor_corrigido == 1050.0));
}

#[test]
fn test_invoice_must_match_installment_contract() {
    let test_db = common::TestDb::new("test_invoice_must_match_installment_contract.db");
    let repo = test_db.repo();

    let client = clients::create_client(&repo, json!({"nome": "Paulo"})).unwrap();
    let mut contract_ids = Vec::new();
    let mut first_installments = Vec::new();
    for numero in ["10", "11"] {
        let lot = lots::create_lot(
            &repo,
            json!({"numero": numero, "quadra": "D", "area": 200, "valor": 6000}),
        )
        .unwrap();
        let detail = contracts::create_contract(
            &repo,
            json!({
                "clientId": client.id.get(),
                "lotId": lot.id.get(),
                "valorTotal": 6000,
                "quantidadeParcelas": 6,
                "dataInicio": "2025-02-01",
                "indiceReajuste": "IGPM",
            }),
        )
        .unwrap();
        contract_ids.push(detail.contract.id.get());
        first_installments.push(detail.parcelas[0].id.get());
    }

    let mismatched = invoices::create_invoice(
        &repo,
        json!({
            "contractId": contract_ids[0],
            "installmentId": first_installments[1],
            "numero": "BOL-1",
            "valor": 1000,
            "dataVencimento": "2025-02-01",
        }),
    );
    assert!(matches!(mismatched, Err(ServiceError::Conflict(_))));

    let invoice = invoices::create_invoice(
        &repo,
        json!({
            "contractId": contract_ids[0],
            "installmentId": first_installments[0],
            "numero": "BOL-1",
            "valor": 1000,
            "dataVencimento": "2025-02-01",
        }),
    )
    .unwrap();

    contracts::pay_installment(
        &repo,
        first_installments[0],
        json!({"dataPagamento": "2025-02-03"}),
        date(2025, 2, 3),
    )
    .unwrap();
    let paid = invoices::get_invoice(&repo, invoice.id.get()).unwrap();
    assert_eq!(paid.status.as_str(), "pago");
    assert_eq!(paid.data_pagamento, Some(date(2025, 2, 3)));

    let listed = invoices::list_invoices(&repo, Some(contract_ids[0]), Some("PAGO".into()), page())
        .unwrap();
    assert_eq!(listed.total, 1);
}

#[test]
fn test_users_and_trigger_configuration() {
    let test_db = common::TestDb::new("test_users_and_trigger_configuration.db");
    let repo = test_db.repo();

    users::create_user(&repo, json!({"nome": "Ana", "email": "Ana@Example.com"})).unwrap();
    let duplicate = users::create_user(&repo, json!({"nome": "Outra", "email": "ana@example.com"}));
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
    assert_eq!(users::list_users(&repo).unwrap().len(), 1);

    let saved = triggers::save_trigger_config(
        &repo,
        json!({
            "gatilhos": [
                {"diasAposVencimento": 15, "tipo": "whatsapp", "mensagem": "Segundo aviso"},
                {"diasAposVencimento": 5, "tipo": "email", "mensagem": "Primeiro aviso"},
            ],
            "agendamento": {"execucaoAutomatica": true, "horario": "09:30"},
        }),
    )
    .unwrap();
    assert_eq!(saved.gatilhos.len(), 2);
    assert!(saved.agendamento.execucao_automatica);

    let reloaded = triggers::get_trigger_config(&repo).unwrap();
    assert_eq!(reloaded, saved);
}

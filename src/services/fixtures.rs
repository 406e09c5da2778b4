//! Sample domain values shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::client::{Client, ClientProfile};
use crate::domain::contract::Contract;
use crate::domain::installment::{Installment, InstallmentStatus};
use crate::domain::lot::{Lot, LotStatus};
use crate::domain::price_adjustment::{AdjustmentStatus, PriceAdjustment};
use crate::domain::types::{
    BlockName, ClientId, ContractId, IndexName, InstallmentId, Label, LotId, LotNumber,
    PersonName, PriceAdjustmentId,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn timestamp() -> NaiveDateTime {
    date(2024, 1, 2).and_hms_opt(12, 0, 0).unwrap()
}

pub fn client(id: i32) -> Client {
    let profile = ClientProfile::default();
    Client {
        id: ClientId::new(id).unwrap(),
        nome: PersonName::new(format!("Cliente {id}")).unwrap(),
        nome_conjuge: profile.nome_conjuge,
        profissao: profile.profissao,
        data_nascimento: profile.data_nascimento,
        email: profile.email,
        telefone: profile.telefone,
        numero_lote: profile.numero_lote,
        quadra: profile.quadra,
        area: profile.area,
        endereco: profile.endereco,
        cidade: profile.cidade,
        estado: profile.estado,
        cep: profile.cep,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn lot(id: i32, status: LotStatus) -> Lot {
    Lot {
        id: LotId::new(id).unwrap(),
        numero: LotNumber::new(id.to_string()).unwrap(),
        quadra: BlockName::new("A").unwrap(),
        area: 360.0,
        valor: 90_000.0,
        status,
        created_at: timestamp(),
    }
}

pub fn contract(id: i32, client_id: i32) -> Contract {
    Contract {
        id: ContractId::new(id).unwrap(),
        client_id: ClientId::new(client_id).unwrap(),
        lot_id: LotId::new(1).unwrap(),
        valor_total: 12_000.0,
        valor_entrada: 0.0,
        quantidade_parcelas: 12,
        data_inicio: date(2024, 1, 10),
        indice_reajuste: IndexName::new("IPCA").unwrap(),
        status: Label::new("ativo").unwrap(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn installment(id: i32, numero: i32, due: NaiveDate, valor: f64, status: &str) -> Installment {
    Installment {
        id: InstallmentId::new(id).unwrap(),
        contract_id: ContractId::new(1).unwrap(),
        numero_parcela: numero,
        data_vencimento: due,
        valor,
        valor_corrigido: valor,
        status: InstallmentStatus::from(status),
        data_pagamento: None,
    }
}

pub fn adjustment(id: i32, data_referencia: NaiveDate, aplicado: bool) -> PriceAdjustment {
    PriceAdjustment {
        id: PriceAdjustmentId::new(id).unwrap(),
        contract_id: ContractId::new(1).unwrap(),
        parcela_referencia: 13,
        valor_original: 1_000.0,
        valor_reajustado: 1_050.0,
        indice_aplicado: 4.0,
        indice_nome: IndexName::new("IPCA").unwrap(),
        percentual_adicional: 1.0,
        reajuste_total: 5.0,
        data_referencia,
        data_aplicacao: aplicado.then_some(data_referencia),
        status: if aplicado {
            AdjustmentStatus::Applied
        } else {
            AdjustmentStatus::Pending
        },
        aplicado,
        created_at: timestamp(),
    }
}

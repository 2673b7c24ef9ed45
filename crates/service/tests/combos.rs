mod common;

use common::MemoryCombos;
use model::{
    CreateComboRequest, LineItemRequest, ListRequest, NewCombo, UpdateComboRequest,
    UpdateLineItem,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use service::{ComboService, ComboServiceImpl, ServiceError};
use uuid::Uuid;

fn combo_request(name: &str, price: Decimal, items: Vec<LineItemRequest>) -> CreateComboRequest {
    CreateComboRequest {
        combo: NewCombo {
            name: name.into(),
            description: "burger, fries and a drink".into(),
            price,
        },
        items,
    }
}

#[tokio::test]
async fn combo_total_is_independent_of_advertised_price() {
    let burger = Uuid::new_v4();
    let fries = Uuid::new_v4();
    let store = MemoryCombos::with_products(&[(burger, dec!(32000)), (fries, dec!(15000))]);
    let service = ComboServiceImpl::new(store.clone());

    let details = service
        .create_combo(&combo_request(
            "Lunch set",
            dec!(42000),
            vec![
                LineItemRequest {
                    product_id: burger,
                    quantity: 1,
                },
                LineItemRequest {
                    product_id: fries,
                    quantity: 1,
                },
            ],
        ))
        .await
        .unwrap();

    assert_eq!(details.combo.price, dec!(42000));
    assert_eq!(details.combo.total_price, dec!(47000));
    assert_eq!(store.item_rows(), 2);
}

#[tokio::test]
async fn invalid_combo_writes_nothing() {
    let burger = Uuid::new_v4();
    let store = MemoryCombos::with_products(&[(burger, dec!(32000))]);
    let service = ComboServiceImpl::new(store.clone());
    let line = |quantity| LineItemRequest {
        product_id: burger,
        quantity,
    };

    let cases = [
        combo_request("", dec!(1), vec![line(1)]),
        combo_request("Set", dec!(-1), vec![line(1)]),
        combo_request("Set", dec!(1), vec![]),
        combo_request("Set", dec!(1), vec![line(0)]),
    ];
    for req in &cases {
        let err = service.create_combo(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");
    }
    assert_eq!(store.combo_rows(), 0);
    assert_eq!(store.item_rows(), 0);
}

#[tokio::test]
async fn update_recomputes_total_and_delete_removes_items() {
    let burger = Uuid::new_v4();
    let store = MemoryCombos::with_products(&[(burger, dec!(30000))]);
    let service = ComboServiceImpl::new(store.clone());

    let created = service
        .create_combo(&combo_request(
            "Duo",
            dec!(55000),
            vec![LineItemRequest {
                product_id: burger,
                quantity: 2,
            }],
        ))
        .await
        .unwrap();

    let updated = service
        .update_combo(
            created.combo.id,
            &UpdateComboRequest {
                name: "Trio".into(),
                description: String::new(),
                price: dec!(80000),
                items: vec![UpdateLineItem {
                    id: Some(created.items[0].id),
                    product_id: burger,
                    quantity: 3,
                }],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.combo.name, "Trio");
    assert_eq!(updated.combo.total_price, dec!(90000));

    let page = service
        .list_combos(&ListRequest::new(Some("tri".into()), 1, 10))
        .await
        .unwrap();
    assert_eq!(page.count, 1);

    service.delete_combo(created.combo.id).await.unwrap();
    assert_eq!(store.item_rows(), 0);
    assert!(matches!(
        service.get_combo(created.combo.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

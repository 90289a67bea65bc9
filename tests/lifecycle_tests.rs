//! End-to-end fund lifecycle tests.
//!
//! Each test drives the full aggregate through its public operations: queue a
//! request, satisfy the freshness gate, execute against a fresh share price,
//! trade through the mock venue, and exercise the failure paths.

use fund_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const USD: AssetId = AssetId(0);
const WETH: AssetId = AssetId(1);
const MLN: AssetId = AssetId(2);
const SHARES: AssetId = AssetId(1000);

const MANAGER: ParticipantId = ParticipantId(0);
const ALICE: ParticipantId = ParticipantId(1);
const BOB: ParticipantId = ParticipantId(2);

const EX0: ExchangeId = ExchangeId(0);
const INTERVAL_MS: i64 = 60_000;

type TestFund = Fund<MockPriceOracle, OpenCompliance, PriceTolerancePolicy>;

fn config_with_rates(management: Decimal, performance: Decimal) -> FundConfig {
    FundConfig {
        name: "Test Fund".to_string(),
        manager: MANAGER,
        denomination_asset: USD,
        native_asset: WETH,
        share_asset: SHARES,
        share_decimals: 18,
        management_rate: management,
        performance_rate: performance,
        owned_asset_ceiling: 90,
    }
}

fn build_fund_with_config(config: FundConfig) -> (TestFund, MockExchange) {
    let mut token = TokenLedger::new();
    token.register_asset(USD, "USD", 6);
    token.register_asset(WETH, "WETH", 18);
    token.register_asset(MLN, "MLN", 18);
    token.mint(USD, Holder::Participant(ALICE), dec!(100_000));
    token.mint(USD, Holder::Participant(BOB), dec!(100_000));
    token.mint(WETH, Holder::Participant(ALICE), dec!(100));
    token.mint(WETH, Holder::Participant(BOB), dec!(100));

    let mut oracle = MockPriceOracle::new(USD, INTERVAL_MS);
    oracle.set_prices(&[(WETH, dec!(2000)), (MLN, dec!(40))]);

    let venue = MockExchange::new();
    let modules = Modules {
        oracle,
        compliance: OpenCompliance,
        risk: PriceTolerancePolicy::default(),
        exchanges: vec![ExchangeSlot::new(EX0, "mock-venue", Box::new(venue.clone()))],
    };

    let fund = Fund::new(config, modules, token, Timestamp::from_millis(0));
    (fund, venue)
}

// zero reward rates so value assertions stay exact
fn build_fund() -> (TestFund, MockExchange) {
    build_fund_with_config(config_with_rates(Decimal::ZERO, Decimal::ZERO))
}

// advance past the pricing interval and record two oracle updates
fn pass_gate(fund: &mut TestFund) {
    fund.advance_time(INTERVAL_MS);
    fund.oracle_mut().tick();
    fund.oracle_mut().tick();
}

fn bootstrap(fund: &mut TestFund, give: Decimal, shares: Decimal) {
    fund.token_ledger_mut()
        .approve(USD, Holder::Participant(ALICE), Holder::Fund, give);
    let id = fund.request_subscription(ALICE, USD, give, shares).unwrap();
    fund.execute_request(id).unwrap();
}

#[test]
fn first_subscription_mints_at_unit_price() {
    let (mut fund, _) = build_fund();

    fund.token_ledger_mut()
        .approve(USD, Holder::Participant(ALICE), Holder::Fund, dec!(100));
    let id = fund.request_subscription(ALICE, USD, dec!(100), dec!(100)).unwrap();

    // no time has passed, no oracle updates: the bootstrap subscription
    // executes anyway
    let executed = fund.execute_request(id).unwrap();

    assert_eq!(executed.share_price, Decimal::ONE);
    assert_eq!(executed.cost_quantity, dec!(100));
    assert_eq!(fund.total_supply(), dec!(100));
    assert_eq!(fund.share_balance_of(ALICE), dec!(100));
    assert_eq!(fund.token_ledger().balance_of(USD, Holder::Fund), dec!(100));
}

#[test]
fn freshness_gate_blocks_after_bootstrap() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(100), dec!(100));

    fund.token_ledger_mut()
        .approve(USD, Holder::Participant(BOB), Holder::Fund, dec!(200));
    let id = fund.request_subscription(BOB, USD, dec!(200), dec!(100)).unwrap();

    // neither interval nor update count satisfied
    assert!(matches!(
        fund.execute_request(id),
        Err(FundError::NotYetExecutable(_))
    ));

    // interval alone is not enough
    fund.advance_time(INTERVAL_MS);
    assert!(matches!(
        fund.execute_request(id),
        Err(FundError::NotYetExecutable(_))
    ));

    // one update is not enough either
    fund.oracle_mut().tick();
    assert!(matches!(
        fund.execute_request(id),
        Err(FundError::NotYetExecutable(_))
    ));

    fund.oracle_mut().tick();
    let executed = fund.execute_request(id).unwrap();
    assert_eq!(executed.cost_quantity, dec!(100));
    assert_eq!(fund.total_supply(), dec!(200));
}

#[test]
fn nav_is_gav_minus_unclaimed_rewards() {
    let (mut fund, _) = build_fund_with_config(config_with_rates(dec!(0.02), dec!(0.20)));
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    fund.advance_time(365 * 24 * 3600 * 1000);
    let calc = fund.perform_calculations().unwrap();

    assert_eq!(calc.gav, dec!(10_000));
    assert_eq!(calc.management_reward, dec!(200));
    assert_eq!(calc.nav, calc.gav - calc.unclaimed_rewards);
}

#[test]
fn high_water_mark_never_ratchets_down() {
    let (mut fund, _) = build_fund_with_config(config_with_rates(Decimal::ZERO, dec!(0.20)));

    // bootstrap settled in the native asset: 10 WETH buys 20000 shares at
    // price 1 USD through the inverted WETH price
    fund.token_ledger_mut()
        .approve(WETH, Holder::Participant(ALICE), Holder::Fund, dec!(10));
    let id = fund
        .request_subscription(ALICE, WETH, dec!(10), dec!(20_000))
        .unwrap();
    fund.execute_request(id).unwrap();
    assert_eq!(fund.token_ledger().balance_of(WETH, Holder::Fund), dec!(10));

    // WETH appreciates: share price rises above the mark
    fund.oracle_mut().set_price(WETH, dec!(2500));
    fund.allocate_unclaimed_rewards(MANAGER).unwrap();
    let mark_after_gain = fund.calculations().high_water_mark;
    assert!(mark_after_gain > Decimal::ONE);

    // WETH falls back: no performance reward, mark unchanged
    fund.oracle_mut().set_price(WETH, dec!(2000));
    let calc = fund.allocate_unclaimed_rewards(MANAGER).unwrap();
    assert_eq!(calc.performance_reward, Decimal::ZERO);
    assert_eq!(fund.calculations().high_water_mark, mark_after_gain);
}

#[test]
fn reward_allocation_mints_diluted_shares() {
    let (mut fund, _) = build_fund_with_config(config_with_rates(dec!(0.02), Decimal::ZERO));
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    fund.advance_time(365 * 24 * 3600 * 1000);
    let calc = fund.allocate_unclaimed_rewards(MANAGER).unwrap();

    // rewards_share_quantity = supply * unclaimed / gav, computed pre-mint
    assert_eq!(calc.unclaimed_rewards, dec!(200));
    assert_eq!(calc.reward_share_quantity, dec!(200));
    assert_eq!(fund.share_balance_of(MANAGER), dec!(200));
    assert_eq!(fund.total_supply(), dec!(10_200));
    // share price was computed against the diluted supply
    assert_eq!(calc.total_supply_with_rewards, dec!(10_200));

    // allocation is the only place the accrual clock advances
    assert_eq!(fund.calculations().timestamp, fund.time());
}

#[test]
fn owned_set_reflects_actual_exposure() {
    let (mut fund, venue) = build_fund();
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    // manager offers USD for WETH: WETH joins the owned set by exposure
    let placed = fund
        .make_order(MANAGER, EX0, USD, WETH, dec!(4000), dec!(2))
        .unwrap();
    assert!(fund.owned_assets().contains(&WETH));
    assert_eq!(fund.custody_held(USD), dec!(4000));

    // nothing filled; cancel returns escrow and the next GAV pass drops WETH
    fund.cancel_order(MANAGER, placed.order_id).unwrap();
    let gav = fund.calc_gav().unwrap();

    assert_eq!(gav, dec!(10_000));
    assert!(!fund.owned_assets().contains(&WETH));
    assert!(fund.owned_assets().contains(&USD));
    assert_eq!(fund.custody_held(USD), Decimal::ZERO);

    // partial fill keeps custody exposure alive
    let placed = fund
        .make_order(MANAGER, EX0, USD, WETH, dec!(4000), dec!(2))
        .unwrap();
    venue
        .fill_order(
            fund.token_ledger_mut(),
            EX0,
            Holder::Participant(BOB),
            placed.exchange_order_id,
            dec!(2000),
        )
        .unwrap();

    let gav = fund.calc_gav().unwrap();
    assert_eq!(gav, dec!(10_000)); // swap at reference prices is value-neutral
    assert!(fund.owned_assets().contains(&WETH));
    assert_eq!(fund.custody_held(USD), dec!(2000));
}

#[test]
fn gav_and_share_price_are_idempotent() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(5000), dec!(5000));

    let gav_1 = fund.calc_gav().unwrap();
    let gav_2 = fund.calc_gav().unwrap();
    assert_eq!(gav_1, gav_2);

    let price_1 = fund.calc_share_price().unwrap();
    let price_2 = fund.calc_share_price().unwrap();
    assert_eq!(price_1, price_2);
}

#[test]
fn stale_price_fails_gav_and_leaves_owned_set_untouched() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    // second subscription settled in WETH so the fund owns two assets
    fund.token_ledger_mut()
        .approve(WETH, Holder::Participant(BOB), Holder::Fund, dec!(1));
    let id = fund
        .request_subscription(BOB, WETH, dec!(1), dec!(1000))
        .unwrap();
    pass_gate(&mut fund);
    fund.execute_request(id).unwrap();
    assert!(fund.owned_assets().contains(&WETH));

    let owned_before = fund.owned_assets().to_vec();
    fund.oracle_mut().mark_stale(WETH);

    let result = fund.calc_gav();
    assert!(matches!(result, Err(FundError::StalePrice(asset)) if asset == WETH));
    assert_eq!(fund.owned_assets(), owned_before.as_slice());
}

#[test]
fn subscribe_then_redeem_round_trips() {
    let (mut fund, _) = build_fund();
    let alice_usd_before = fund.token_ledger().balance_of(USD, Holder::Participant(ALICE));

    bootstrap(&mut fund, dec!(750), dec!(750));

    let id = fund
        .request_redemption(ALICE, USD, dec!(750), dec!(750))
        .unwrap();
    pass_gate(&mut fund);
    let executed = fund.execute_request(id).unwrap();

    // zero rates, unchanged price: full principal comes back
    assert_eq!(executed.cost_quantity, dec!(750));
    assert_eq!(fund.total_supply(), Decimal::ZERO);
    assert_eq!(
        fund.token_ledger().balance_of(USD, Holder::Participant(ALICE)),
        alice_usd_before
    );
}

#[test]
fn share_price_with_zero_supply_fails() {
    let (mut fund, _) = build_fund();

    // value in the fund but no shares outstanding
    fund.token_ledger_mut().mint(USD, Holder::Fund, dec!(500));

    assert!(matches!(
        fund.calc_share_price(),
        Err(FundError::DivisionByZero)
    ));
}

#[test]
fn second_make_order_on_same_sell_asset_rejected() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    fund.make_order(MANAGER, EX0, USD, WETH, dec!(2000), dec!(1))
        .unwrap();

    let result = fund.make_order(MANAGER, EX0, USD, MLN, dec!(2000), dec!(50));
    assert!(matches!(result, Err(FundError::PreconditionFailed(_))));
    assert_eq!(fund.order_count(), 1);
}

#[test]
fn emergency_redeem_pays_pro_rata_balances() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    let redeemed = fund.emergency_redeem(ALICE, dec!(400)).unwrap();

    assert_eq!(redeemed.payouts, vec![(USD, dec!(400))]);
    assert_eq!(fund.total_supply(), dec!(600));
    assert_eq!(fund.share_balance_of(ALICE), dec!(600));
}

#[test]
fn emergency_redeem_inconsistency_shuts_fund_down() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    // most of the USD sits in venue escrow behind an open make order
    fund.make_order(MANAGER, EX0, USD, WETH, dec!(800), dec!(0.4))
        .unwrap();

    let events_before = fund.events().len();
    let result = fund.emergency_redeem(ALICE, dec!(1000));

    assert!(matches!(
        result,
        Err(FundError::AccountingInconsistency { asset, .. }) if asset == USD
    ));
    assert!(fund.is_shut_down());
    // shares were not burned, nothing was transferred
    assert_eq!(fund.total_supply(), dec!(1000));
    assert_eq!(fund.share_balance_of(ALICE), dec!(1000));
    assert_eq!(fund.token_ledger().balance_of(USD, Holder::Fund), dec!(200));
    // the only trace is the shutdown event
    assert_eq!(fund.events().len(), events_before + 1);
    assert!(matches!(
        fund.events().last().unwrap().payload,
        EventPayload::FundShutDown(_)
    ));
}

#[test]
fn failed_execution_is_atomic() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    // bob offers less than the shares will cost
    fund.token_ledger_mut()
        .approve(USD, Holder::Participant(BOB), Holder::Fund, dec!(50));
    let id = fund.request_subscription(BOB, USD, dec!(50), dec!(100)).unwrap();
    pass_gate(&mut fund);

    let bob_usd = fund.token_ledger().balance_of(USD, Holder::Participant(BOB));
    let events_before = fund.events().len();

    let result = fund.execute_request(id);
    assert!(matches!(result, Err(FundError::SlippageExceeded { .. })));

    // indistinguishable from never having been attempted
    assert_eq!(fund.total_supply(), dec!(1000));
    assert_eq!(fund.token_ledger().balance_of(USD, Holder::Participant(BOB)), bob_usd);
    assert_eq!(fund.request(id).unwrap().status, RequestStatus::Active);
    assert_eq!(fund.events().len(), events_before);
}

#[test]
fn redemption_slippage_protects_the_investor() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    // demands more than the shares are worth
    let id = fund
        .request_redemption(ALICE, USD, dec!(100), dec!(150))
        .unwrap();
    pass_gate(&mut fund);

    assert!(matches!(
        fund.execute_request(id),
        Err(FundError::SlippageExceeded { .. })
    ));
    assert_eq!(fund.total_supply(), dec!(1000));
}

#[test]
fn cancel_request_permissions() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    let id = fund
        .request_redemption(ALICE, USD, dec!(100), dec!(90))
        .unwrap();

    // a stranger cannot cancel someone else's request
    assert!(matches!(
        fund.cancel_request(BOB, id),
        Err(FundError::PermissionDenied)
    ));

    // the participant can
    fund.cancel_request(ALICE, id).unwrap();
    assert_eq!(fund.request(id).unwrap().status, RequestStatus::Cancelled);

    // once shut down, anyone can cancel (emergency exit)
    let id = fund
        .request_redemption(ALICE, USD, dec!(100), dec!(90))
        .unwrap();
    fund.shut_down(MANAGER).unwrap();
    fund.cancel_request(BOB, id).unwrap();
    assert_eq!(fund.request(id).unwrap().status, RequestStatus::Cancelled);
}

#[test]
fn transfer_initiated_redemption_escrows_shares() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    let id = fund
        .request_redemption_by_transfer(ALICE, USD, dec!(200), dec!(190))
        .unwrap();
    assert_eq!(fund.share_balance_of(ALICE), dec!(800));

    // cancellation returns the escrowed shares
    fund.cancel_request(ALICE, id).unwrap();
    assert_eq!(fund.share_balance_of(ALICE), dec!(1000));

    // executed escrow burns from the fund's holding
    let id = fund
        .request_redemption_by_transfer(ALICE, USD, dec!(200), dec!(190))
        .unwrap();
    pass_gate(&mut fund);
    let executed = fund.execute_request(id).unwrap();

    assert_eq!(executed.cost_quantity, dec!(200));
    assert_eq!(fund.total_supply(), dec!(800));
    assert_eq!(fund.share_balance_of(ALICE), dec!(800));
}

#[test]
fn compliance_gate_blocks_request_creation() {
    let mut token = TokenLedger::new();
    token.register_asset(USD, "USD", 6);
    token.mint(USD, Holder::Participant(ALICE), dec!(1000));

    let mut oracle = MockPriceOracle::new(USD, INTERVAL_MS);
    oracle.tick();

    // empty whitelist: nobody may subscribe
    let modules = Modules {
        oracle,
        compliance: WhitelistCompliance::new(),
        risk: PriceTolerancePolicy::default(),
        exchanges: vec![],
    };
    let mut fund = Fund::new(
        config_with_rates(Decimal::ZERO, Decimal::ZERO),
        modules,
        token,
        Timestamp::from_millis(0),
    );

    let result = fund.request_subscription(ALICE, USD, dec!(100), dec!(100));
    assert!(matches!(result, Err(FundError::PermissionDenied)));
    assert_eq!(fund.request_count(), 0);
}

#[test]
fn risk_gate_rejects_off_market_make_order() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    // reference is 0.0005 WETH per USD; offering at half that is 50% off
    let result = fund.make_order(MANAGER, EX0, USD, WETH, dec!(4000), dec!(1));
    assert!(matches!(result, Err(FundError::PreconditionFailed(_))));
    assert_eq!(fund.order_count(), 0);
    assert_eq!(fund.custody_held(USD), Decimal::ZERO);
}

#[test]
fn owned_asset_ceiling_enforced() {
    let mut config = config_with_rates(Decimal::ZERO, Decimal::ZERO);
    config.owned_asset_ceiling = 1;
    let (mut fund, _) = build_fund_with_config(config);
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    // owned set is already at the ceiling with just the denomination asset
    let result = fund.make_order(MANAGER, EX0, USD, WETH, dec!(2000), dec!(1));
    assert!(matches!(result, Err(FundError::CapacityExceeded(1))));
}

#[test]
fn take_order_swaps_against_a_seeded_venue_order() {
    let (mut fund, venue) = build_fund();
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    // bob rests 5 WETH for 10000 USD on the venue
    let venue_order = venue
        .seed_order(
            fund.token_ledger_mut(),
            EX0,
            Holder::Participant(BOB),
            WETH,
            USD,
            dec!(5),
            dec!(10_000),
        )
        .unwrap();

    let order_id = fund
        .take_order(MANAGER, EX0, venue_order, dec!(2))
        .unwrap();

    let order = fund.order(order_id).unwrap();
    assert_eq!(order.kind, OrderKind::Take);
    assert_eq!(order.status, OrderStatus::FullyFilled);
    assert_eq!(order.fill_quantity, dec!(2));

    assert_eq!(fund.token_ledger().balance_of(WETH, Holder::Fund), dec!(2));
    assert_eq!(fund.token_ledger().balance_of(USD, Holder::Fund), dec!(6000));
    assert!(fund.owned_assets().contains(&WETH));

    // value-neutral swap at reference prices
    assert_eq!(fund.calc_gav().unwrap(), dec!(10_000));
}

#[test]
fn make_order_syncs_fill_state_from_the_venue() {
    let (mut fund, venue) = build_fund();
    bootstrap(&mut fund, dec!(10_000), dec!(10_000));

    let placed = fund
        .make_order(MANAGER, EX0, USD, WETH, dec!(4000), dec!(2))
        .unwrap();
    assert_eq!(fund.sync_order(placed.order_id).unwrap(), OrderStatus::Active);

    venue
        .fill_order(
            fund.token_ledger_mut(),
            EX0,
            Holder::Participant(BOB),
            placed.exchange_order_id,
            dec!(1000),
        )
        .unwrap();
    assert_eq!(
        fund.sync_order(placed.order_id).unwrap(),
        OrderStatus::PartiallyFilled
    );
    assert_eq!(fund.order(placed.order_id).unwrap().fill_quantity, dec!(1000));

    venue
        .fill_order(
            fund.token_ledger_mut(),
            EX0,
            Holder::Participant(BOB),
            placed.exchange_order_id,
            dec!(3000),
        )
        .unwrap();
    assert_eq!(
        fund.sync_order(placed.order_id).unwrap(),
        OrderStatus::FullyFilled
    );

    // fully spent custody clears lazily
    assert_eq!(fund.custody_held(USD), Decimal::ZERO);
}

#[test]
fn manager_only_operations() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    assert!(matches!(
        fund.make_order(ALICE, EX0, USD, WETH, dec!(100), dec!(0.05)),
        Err(FundError::PermissionDenied)
    ));
    assert!(matches!(
        fund.allocate_unclaimed_rewards(ALICE),
        Err(FundError::PermissionDenied)
    ));
    assert!(matches!(
        fund.shut_down(ALICE),
        Err(FundError::PermissionDenied)
    ));
    assert!(!fund.is_shut_down());
}

#[test]
fn disabled_subscriptions_reject_requests() {
    let (mut fund, _) = build_fund();

    fund.set_subscriptions_allowed(MANAGER, false).unwrap();
    let result = fund.request_subscription(ALICE, USD, dec!(100), dec!(100));
    assert!(matches!(result, Err(FundError::PreconditionFailed(_))));

    fund.set_subscriptions_allowed(MANAGER, true).unwrap();
    fund.request_subscription(ALICE, USD, dec!(100), dec!(100)).unwrap();
}

#[test]
fn shut_down_fund_rejects_new_requests() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    fund.shut_down(MANAGER).unwrap();

    assert!(matches!(
        fund.request_subscription(BOB, USD, dec!(100), dec!(100)),
        Err(FundError::PreconditionFailed(_))
    ));
    assert!(matches!(
        fund.request_redemption(ALICE, USD, dec!(100), dec!(90)),
        Err(FundError::PreconditionFailed(_))
    ));
    // the emergency path still works
    fund.emergency_redeem(ALICE, dec!(1000)).unwrap();
}

#[test]
fn venue_reporting_zero_order_id_fails_cleanly() {
    let (mut fund, venue) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    venue.zero_id_next_make();
    let result = fund.make_order(MANAGER, EX0, USD, WETH, dec!(500), dec!(0.25));

    assert!(matches!(result, Err(FundError::PreconditionFailed(_))));
    assert_eq!(fund.order_count(), 0);
    assert_eq!(fund.custody_held(USD), Decimal::ZERO);
    // the escrow approval was rolled back with everything else
    assert_eq!(
        fund.token_ledger()
            .allowance(USD, Holder::Fund, Holder::Exchange(EX0)),
        Decimal::ZERO
    );
}

#[test]
fn fund_cannot_trade_its_own_shares() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    let result = fund.make_order(MANAGER, EX0, USD, SHARES, dec!(100), dec!(100));
    assert!(matches!(result, Err(FundError::PreconditionFailed(_))));
}

#[test]
fn native_asset_request_settles_through_inverted_price() {
    let (mut fund, _) = build_fund();
    bootstrap(&mut fund, dec!(1000), dec!(1000));

    // redeem 200 shares settled in WETH: 200 USD worth = 0.1 WETH at 2000
    // the fund needs WETH on hand to pay out
    fund.token_ledger_mut().mint(WETH, Holder::Fund, dec!(1));

    let id = fund
        .request_redemption(ALICE, WETH, dec!(200), dec!(0.09))
        .unwrap();
    pass_gate(&mut fund);
    let executed = fund.execute_request(id).unwrap();

    assert_eq!(executed.cost_quantity, dec!(0.1));
    assert_eq!(
        fund.token_ledger().balance_of(WETH, Holder::Participant(ALICE)),
        dec!(100.1)
    );
}

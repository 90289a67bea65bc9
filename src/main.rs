//! Fund Core Simulation.
//!
//! Demonstrates the full fund lifecycle including subscription, manager trading
//! through an exchange adapter, reward allocation, redemption, and the
//! emergency redemption path.

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

const ORACLE_INTERVAL_MS: i64 = 60_000;

fn main() {
    println!("Fund Core Engine Simulation");
    println!("Single Fund, Deterministic Clock, Full Lifecycle\n");

    scenario_1_bootstrap_subscription();
    scenario_2_reward_allocation();
    scenario_3_manager_trading();
    scenario_4_redemption();
    scenario_5_emergency_redemption();

    println!("\nAll simulations completed successfully.");
}

type SimFund = Fund<MockPriceOracle, OpenCompliance, PriceTolerancePolicy>;

fn build_fund() -> (SimFund, MockExchange) {
    let mut token = TokenLedger::new();
    token.register_asset(USD, "USD", 6);
    token.register_asset(WETH, "WETH", 18);
    token.register_asset(MLN, "MLN", 18);
    token.mint(USD, Holder::Participant(ALICE), dec!(100_000));
    token.mint(USD, Holder::Participant(BOB), dec!(100_000));
    token.mint(WETH, Holder::Participant(BOB), dec!(100));

    let mut oracle = MockPriceOracle::new(USD, ORACLE_INTERVAL_MS);
    oracle.set_prices(&[(WETH, dec!(2000)), (MLN, dec!(40))]);

    let venue = MockExchange::new();
    let modules = Modules {
        oracle,
        compliance: OpenCompliance,
        risk: PriceTolerancePolicy::default(),
        exchanges: vec![ExchangeSlot::new(
            ExchangeId(0),
            "mock-venue",
            Box::new(venue.clone()),
        )],
    };

    let config = FundConfig {
        name: "Sim Fund".to_string(),
        manager: MANAGER,
        denomination_asset: USD,
        native_asset: WETH,
        share_asset: SHARES,
        share_decimals: 18,
        management_rate: dec!(0.02),
        performance_rate: dec!(0.20),
        owned_asset_ceiling: 90,
    };

    let fund = Fund::new(config, modules, token, Timestamp::from_millis(0));
    (fund, venue)
}

// queue a subscription, satisfy the freshness gate, execute
fn subscribe(fund: &mut SimFund, who: ParticipantId, give: Decimal, shares: Decimal) -> ExecutedRequest {
    fund.token_ledger_mut()
        .approve(USD, Holder::Participant(who), Holder::Fund, give);
    let id = fund.request_subscription(who, USD, give, shares).unwrap();

    if !fund.total_supply().is_zero() {
        fund.advance_time(ORACLE_INTERVAL_MS);
        fund.oracle_mut().tick();
        fund.oracle_mut().tick();
    }
    fund.execute_request(id).unwrap()
}

fn scenario_1_bootstrap_subscription() {
    println!("Scenario 1: Bootstrap Subscription\n");

    let (mut fund, _) = build_fund();
    println!("  Alice offers $100 for 100 shares into an empty fund");

    let executed = subscribe(&mut fund, ALICE, dec!(100), dec!(100));

    println!("  cost: {} USD at share price {}", executed.cost_quantity, executed.share_price);
    println!("  total supply: {}\n", fund.total_supply());

    assert_eq!(executed.cost_quantity, dec!(100));
    assert_eq!(fund.total_supply(), dec!(100));
}

fn scenario_2_reward_allocation() {
    println!("Scenario 2: Reward Accrual and Allocation\n");

    let (mut fund, _) = build_fund();
    subscribe(&mut fund, ALICE, dec!(10_000), dec!(10_000));

    // one year passes; management rewards accrue
    fund.advance_time(365 * 24 * 3600 * 1000);
    let calc = fund.perform_calculations().unwrap();
    println!("  after one year: gav {}, unclaimed rewards {}", calc.gav, calc.unclaimed_rewards);
    println!("  nav = gav - unclaimed = {}", calc.nav);

    let allocated = fund.allocate_unclaimed_rewards(MANAGER).unwrap();
    println!(
        "  manager received {} reward shares, high-water-mark {}\n",
        allocated.reward_share_quantity,
        fund.calculations().high_water_mark
    );

    assert_eq!(calc.nav, calc.gav - calc.unclaimed_rewards);
    assert!(fund.share_balance_of(MANAGER) > Decimal::ZERO);
}

fn scenario_3_manager_trading() {
    println!("Scenario 3: Manager Trading Through an Adapter\n");

    let (mut fund, venue) = build_fund();
    subscribe(&mut fund, ALICE, dec!(10_000), dec!(10_000));

    // manager offers 4000 USD for 2 WETH (reference price 2000)
    let placed = fund
        .make_order(MANAGER, ExchangeId(0), USD, WETH, dec!(4000), dec!(2))
        .unwrap();
    println!("  make order placed, venue id {:?}", placed.exchange_order_id);
    println!("  custody held (USD): {}", fund.custody_held(USD));

    // a counterparty takes half the order
    venue
        .fill_order(
            fund.token_ledger_mut(),
            ExchangeId(0),
            Holder::Participant(BOB),
            placed.exchange_order_id,
            dec!(2000),
        )
        .unwrap();

    let status = fund.sync_order(placed.order_id).unwrap();
    println!("  after counterparty fill: status {:?}", status);

    let gav = fund.calc_gav().unwrap();
    println!("  gav (unchanged by the swap at reference prices): {}", gav);
    println!("  owned assets: {:?}\n", fund.owned_assets());

    assert_eq!(status, OrderStatus::PartiallyFilled);
    assert_eq!(gav, dec!(10_000));
}

fn scenario_4_redemption() {
    println!("Scenario 4: Redemption Round Trip\n");

    let (mut fund, _) = build_fund();
    subscribe(&mut fund, ALICE, dec!(1000), dec!(1000));

    let id = fund
        .request_redemption(ALICE, USD, dec!(400), dec!(390))
        .unwrap();
    fund.advance_time(ORACLE_INTERVAL_MS);
    fund.oracle_mut().tick();
    fund.oracle_mut().tick();

    let executed = fund.execute_request(id).unwrap();
    println!("  Alice redeemed 400 shares for {} USD", executed.cost_quantity);
    println!("  remaining supply: {}\n", fund.total_supply());

    // slightly under 400: management rewards accrued over the pricing interval
    assert!(executed.cost_quantity <= dec!(400));
    assert!(executed.cost_quantity >= dec!(390));
    assert_eq!(fund.total_supply(), dec!(600));
}

fn scenario_5_emergency_redemption() {
    println!("Scenario 5: Emergency Redemption\n");

    let (mut fund, _) = build_fund();
    subscribe(&mut fund, ALICE, dec!(1000), dec!(1000));

    // price-feed-independent exit: half of Alice's shares
    let redeemed = fund.emergency_redeem(ALICE, dec!(500)).unwrap();
    println!("  payouts: {:?}", redeemed.payouts);
    println!("  remaining supply: {}", fund.total_supply());

    assert_eq!(redeemed.payouts, vec![(USD, dec!(500))]);
    assert_eq!(fund.total_supply(), dec!(500));

    // now with custody stuck on a venue: owed exceeds on-hand balance
    let (mut fund, _) = build_fund();
    subscribe(&mut fund, ALICE, dec!(1000), dec!(1000));
    fund.make_order(MANAGER, ExchangeId(0), USD, WETH, dec!(800), dec!(0.4))
        .unwrap();

    let result = fund.emergency_redeem(ALICE, dec!(1000));
    println!("  full redemption against escrowed custody: {:?}", result.err().map(|e| e.to_string()));
    println!("  fund shut down: {}", fund.is_shut_down());

    assert!(fund.is_shut_down());
    assert_eq!(fund.total_supply(), dec!(1000)); // shares were not burned
}

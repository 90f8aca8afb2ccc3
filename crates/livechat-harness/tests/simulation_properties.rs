//! Randomized simulations of two visitors and an agent.
//!
//! Arbitrary interleavings of user intents, conversation switches and
//! connection drops run through the production runtime against the simulated
//! backend. The standard invariants are checked on every render; the
//! backend's store must agree with what every side displays.

use livechat_app::{App, AppEvent, ClientConfig, Runtime, UserInput};
use livechat_harness::{
    ClientSnapshot, InvariantRegistry, SharedBackend, SimBackend, SimDriver, SimEnv,
    SystemSnapshot,
};
use livechat_client::{Origin, SenderRole};
use livechat_proto::CustomerDetails;
use proptest::prelude::*;

type SimRuntime = Runtime<SimDriver, SimEnv>;

/// Customers with a visitor client in every simulation.
const CUSTOMERS: [(u64, &str); 2] = [(42, "Ada"), (77, "Grace")];

#[derive(Debug, Clone)]
enum Op {
    Visitor(usize, UserInput),
    Agent(UserInput),
    SelectNewest,
    /// Select the oldest then the newest conversation in one batch, so the
    /// second history request goes out before the first reply is read.
    SwitchTwice,
    DropVisitor(usize),
    Tick,
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z][a-z ]{0,15}",
        1 => Just("   ".to_string()),
        1 => (495usize..505).prop_map(|n| "y".repeat(n)),
    ]
}

fn panel_strategy() -> impl Strategy<Value = UserInput> {
    prop_oneof![Just(UserInput::Open), Just(UserInput::Close), Just(UserInput::Toggle)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let visitor = 0..CUSTOMERS.len();
    prop_oneof![
        3 => (visitor.clone(), panel_strategy()).prop_map(|(i, input)| Op::Visitor(i, input)),
        4 => (visitor.clone(), text_strategy())
            .prop_map(|(i, t)| Op::Visitor(i, UserInput::Submit(t))),
        2 => panel_strategy().prop_map(Op::Agent),
        4 => text_strategy().prop_map(|t| Op::Agent(UserInput::Submit(t))),
        2 => Just(Op::SelectNewest),
        2 => Just(Op::SwitchTwice),
        1 => Just(Op::Agent(UserInput::ShowDetails)),
        1 => visitor.prop_map(Op::DropVisitor),
        1 => Just(Op::Tick),
    ]
}

async fn settle(visitors: &mut [SimRuntime], agent: &mut SimRuntime) {
    for _ in 0..6 {
        for visitor in visitors.iter_mut() {
            visitor.run_until_idle().await.unwrap();
        }
        agent.run_until_idle().await.unwrap();
    }
}

fn select(agent: &SimRuntime, session_id: Option<u64>) {
    if let Some(session_id) = session_id {
        agent.driver().inject_event(AppEvent::Input(UserInput::Select(session_id)));
    }
}

/// Once its history is loaded, the agent pane shows exactly what the backend
/// stored for the active conversation.
fn check_pane(agent: &SimRuntime, backend: &SharedBackend) -> Result<(), TestCaseError> {
    let widget = agent.app().widget();
    let Some(active) = agent.app().dashboard().and_then(|d| d.active()) else {
        return Ok(());
    };
    if !widget.history_loaded() {
        return Ok(());
    }

    let shown: Vec<_> = widget
        .messages()
        .iter()
        .filter(|m| m.role != SenderRole::System)
        .map(|m| m.text.clone())
        .collect();
    let stored: Vec<_> = backend
        .lock()
        .unwrap()
        .session(active)
        .map(|s| s.messages.iter().map(|m| m.text.clone()).collect())
        .unwrap_or_default();
    prop_assert_eq!(shown, stored, "pane disagrees with session {}", active);
    Ok(())
}

async fn simulate(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let env = SimEnv::new();
    let mut backend = SimBackend::new(env.clone());
    for (id, name) in CUSTOMERS {
        backend.add_customer(id, name, CustomerDetails::default());
    }
    let backend: SharedBackend = backend.shared();

    let mut visitors: Vec<SimRuntime> = CUSTOMERS
        .iter()
        .map(|&(id, _)| {
            Runtime::new(
                SimDriver::visitor(backend.clone(), id)
                    .with_id(id)
                    .with_invariants(InvariantRegistry::standard()),
                App::new(ClientConfig::default(), env.clone()),
            )
        })
        .collect();
    let mut agent = Runtime::new(
        SimDriver::agent(backend.clone()).with_id(1).with_invariants(InvariantRegistry::standard()),
        App::new(ClientConfig::agent(), env.clone()),
    );
    for visitor in &mut visitors {
        visitor.start().await.unwrap();
    }
    agent.start().await.unwrap();
    settle(&mut visitors, &mut agent).await;

    for op in ops {
        match op {
            Op::Visitor(i, input) => visitors[i].driver().inject_event(AppEvent::Input(input)),
            Op::Agent(input) => agent.driver().inject_event(AppEvent::Input(input)),
            Op::SelectNewest => {
                let newest = agent
                    .app()
                    .dashboard()
                    .and_then(|d| d.conversations().first().map(|c| c.session_id));
                select(&agent, newest);
            },
            Op::SwitchTwice => {
                let (oldest, newest) = agent
                    .app()
                    .dashboard()
                    .map(|d| {
                        let ids = d.conversations();
                        (ids.last().map(|c| c.session_id), ids.first().map(|c| c.session_id))
                    })
                    .unwrap_or_default();
                select(&agent, oldest);
                select(&agent, newest);
            },
            Op::DropVisitor(i) => {
                if let Some(connection) = visitors[i].driver().connection() {
                    backend.lock().unwrap().drop_connection(connection);
                }
            },
            Op::Tick => {
                env.advance(1);
                for visitor in &visitors {
                    visitor.driver().inject_tick();
                }
            },
        }
        settle(&mut visitors, &mut agent).await;

        let mut clients: Vec<_> = CUSTOMERS
            .iter()
            .zip(&visitors)
            .map(|(&(id, _), visitor)| ClientSnapshot::from_app(id, visitor.app()))
            .collect();
        clients.push(ClientSnapshot::from_app(1, agent.app()));
        let snapshot = SystemSnapshot::from_clients(clients);
        InvariantRegistry::standard().assert_all(&snapshot, "after op");
        check_pane(&agent, &backend)?;
    }

    // Everything a visitor sent while connected was stored, in order.
    let store = backend.lock().unwrap();
    for (&(id, _), visitor) in CUSTOMERS.iter().zip(&visitors) {
        let stored: Vec<_> = store
            .session_of(id)
            .map(|s| {
                s.messages
                    .iter()
                    .filter(|m| m.sender == SenderRole::Visitor)
                    .map(|m| m.text.clone())
                    .collect()
            })
            .unwrap_or_default();
        let shown_local = visitor
            .app()
            .widget()
            .messages()
            .iter()
            .filter(|m| m.origin == Origin::Local && m.role == SenderRole::Visitor)
            .map(|m| m.text.clone());
        for text in shown_local {
            prop_assert!(
                stored.contains(&text),
                "optimistic send {text:?} never reached the backend"
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_simulated_conversations_hold_invariants(
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(simulate(ops))?;
    }
}

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tandem_sim::queues::random_generator::{RandomGenerator, RandomParams};
use tandem_sim::{
    Arrival, EventKind, JobState, OverflowPolicy, SimulationConfig, StopCondition, TandemNetwork,
};

const EPS: f64 = 1e-9;

fn network(fast: usize, overflow: usize, limit: f64, policy: OverflowPolicy, arrivals: &[Arrival]) -> TandemNetwork {
    let mut qn = TandemNetwork::new(SimulationConfig::new(fast, overflow, limit).with_overflow(policy));
    for a in arrivals {
        qn.add_job(*a).unwrap();
    }
    qn
}

fn random_network(fast: usize, overflow: usize, limit: f64, jobs: usize, seed: u64) -> TandemNetwork {
    let params = RandomParams {
        lambda: 3.1, a2l: 0.85, a2u: 1.21,
        p0: 0.74,
        alpha0: 0.5, beta0: 5.7, eta0: 1.9,
        alpha1: 2.7, eta1: 2.5,
    };
    let config = SimulationConfig::new(fast, overflow, limit).with_stop(StopCondition::Jobs(jobs));
    let mut qn = TandemNetwork::new(config);
    let mut source = RandomGenerator::new(&params, None, StdRng::seed_from_u64(seed)).unwrap();
    qn.load(&mut source).unwrap();
    qn
}

fn assert_single_occupancy(qn: &TandemNetwork) {
    let mut held = HashSet::new();
    for group in qn.groups() {
        for server in group.servers() {
            if let Some(job) = server.current_job() {
                assert!(held.insert(job), "job {} held twice", job);
                assert_eq!(qn.jobs()[job].state(), JobState::InService(group.id()));
            }
        }
    }
    for group in qn.groups() {
        for job in group.waiting() {
            assert!(!held.contains(&job), "job {} both queued and in service", job);
            assert_eq!(qn.jobs()[job].state(), JobState::Queued(group.id()));
        }
    }
}

#[test]
fn scenario_fifo_single_server() {
    let mut qn = network(1, 0, f64::INFINITY, OverflowPolicy::Restart,
                         &[Arrival::new(0., 2., 0), Arrival::new(1., 1., 0)]);
    qn.run().unwrap().ensure_complete().unwrap();

    let jobs = qn.jobs();
    assert_eq!(jobs[0].completion_time(), Some(2.));
    assert_eq!(jobs[1].start_time(), Some(2.));
    assert_eq!(jobs[1].completion_time(), Some(3.));
}

#[test]
fn scenario_cutoff_without_rerouting_leaves_job_unfinished() {
    let mut qn = network(1, 1, 1., OverflowPolicy::Drop, &[Arrival::new(0., 3., 0)]);

    let arrival = qn.make_transition().unwrap().unwrap();
    assert_eq!(arrival.kind, EventKind::Arrival);
    let departure = qn.make_transition().unwrap().unwrap();
    assert_eq!(departure.kind, EventKind::Departure);
    assert!((departure.time - 1.).abs() < EPS);

    let outcome = qn.run().unwrap();
    assert_eq!(qn.jobs()[0].completion_time(), None);
    assert_eq!(outcome.unfinished, 1);
    assert!(outcome.ensure_complete().is_err());
}

#[test]
fn scenario_cutoff_with_overflow_policies() {
    let mut restart = network(1, 1, 1., OverflowPolicy::Restart, &[Arrival::new(0., 3., 0)]);
    restart.run().unwrap();
    assert!((restart.jobs()[0].completion_time().unwrap() - 4.).abs() < EPS);

    let mut resume = network(1, 1, 1., OverflowPolicy::Resume, &[Arrival::new(0., 3., 0)]);
    resume.run().unwrap();
    assert!((resume.jobs()[0].completion_time().unwrap() - 3.).abs() < EPS);
    assert_eq!(resume.jobs()[0].visited_groups(), &[0, 1]);
}

#[test]
fn scenario_no_servers_queues_forever() {
    let mut qn = network(0, 1, f64::INFINITY, OverflowPolicy::Restart, &[Arrival::new(0., 1., 0)]);
    let outcome = qn.run().unwrap();

    assert_eq!(outcome.events, 1);
    assert_eq!(outcome.unfinished, 1);
    assert_eq!(qn.jobs()[0].state(), JobState::Queued(0));
    assert_eq!(qn.groups()[0].waiting().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn scenario_simultaneous_arrivals_keep_insertion_order() {
    let mut qn = network(1, 0, f64::INFINITY, OverflowPolicy::Restart,
                         &[Arrival::new(5., 1., 0), Arrival::new(5., 1., 0)]);

    qn.make_transition().unwrap();
    assert_eq!(qn.jobs()[0].state(), JobState::InService(0));
    qn.make_transition().unwrap();
    assert_eq!(qn.jobs()[1].state(), JobState::Queued(0));

    let dep = qn.make_transition().unwrap().unwrap();
    assert_eq!((dep.kind, dep.job), (EventKind::Departure, 0));
    assert_eq!(qn.jobs()[1].start_time(), Some(6.));

    qn.run().unwrap();
    assert_eq!(qn.jobs()[1].completion_time(), Some(7.));
}

#[test]
fn events_are_processed_in_time_order_with_invariants_held() {
    let mut qn = random_network(3, 2, 1.5, 2000, 5);
    let mut last = 0.;
    while let Some(event) = qn.make_transition().unwrap() {
        assert!(event.time >= last);
        last = event.time;
        assert_single_occupancy(&qn);
    }
    assert_eq!(qn.outcome().unfinished, 0);
}

#[test]
fn completion_matches_start_plus_work() {
    let mut qn = random_network(4, 2, 3.3, 3000, 9);
    qn.run().unwrap().ensure_complete().unwrap();

    for job in qn.jobs() {
        let done = job.completion_time().unwrap();
        assert!(done >= job.arrival_time());
        assert!((done - job.start_time().unwrap() - job.stage_work()).abs() <= 2e-4);
        if job.visited_groups().len() == 1 {
            assert!((job.stage_work() - job.service_time()).abs() < EPS);
        }
    }
}

#[test]
fn waiting_jobs_start_in_arrival_order() {
    let mut qn = random_network(2, 1, f64::INFINITY, 2000, 21);
    qn.run().unwrap();

    let mut fast: Vec<_> = qn.jobs().iter()
        .filter(|j| j.origin_group() == 0)
        .map(|j| (j.arrival_time(), j.id(), j.start_time().unwrap()))
        .collect();
    fast.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    for pair in fast.windows(2) {
        assert!(pair[0].2 <= pair[1].2, "job {} started after job {}", pair[0].1, pair[1].1);
    }
}

#[test]
fn overflow_queue_serves_evicted_and_direct_jobs_in_entry_order() {
    // overflow queue entries: job 2 at 1.0, job 1 (cut) at 1.5, job 3 at 2.0, job 4 (cut) at 2.5
    let mut qn = network(2, 1, 1., OverflowPolicy::Restart, &[
        Arrival::new(0., 5., 1),
        Arrival::new(0.5, 2., 0),
        Arrival::new(1., 1., 1),
        Arrival::new(2., 1., 1),
        Arrival::new(1.5, 4., 0),
    ]);
    assert_eq!((qn.config().fast_servers, qn.config().overflow_servers), (2, 1));
    qn.run().unwrap().ensure_complete().unwrap();

    let jobs = qn.jobs();
    let starts: Vec<f64> = [2, 1, 3, 4].iter().map(|&j| jobs[j].start_time().unwrap()).collect();
    let dones: Vec<f64> = [2, 1, 3, 4].iter().map(|&j| jobs[j].completion_time().unwrap()).collect();
    for (got, want) in starts.iter().zip([5., 6., 8., 9.]) {
        assert!((got - want).abs() < EPS, "start {} != {}", got, want);
    }
    for (got, want) in dones.iter().zip([6., 8., 9., 13.]) {
        assert!((got - want).abs() < EPS, "completion {} != {}", got, want);
    }
    assert_eq!(jobs[1].visited_groups(), &[0, 1]);
    assert_eq!(jobs[4].visited_groups(), &[0, 1]);
    assert_eq!(jobs[2].visited_groups(), &[1]);
}

#[test]
fn event_count_is_bounded() {
    let mut qn = random_network(3, 3, f64::INFINITY, 1000, 2);
    let outcome = qn.run().unwrap();
    assert_eq!(outcome.events, 2 * outcome.jobs);

    let mut capped = random_network(3, 3, 0.5, 1000, 2);
    let outcome = capped.run().unwrap();
    assert!(outcome.events <= 3 * outcome.jobs);
}

#[test]
fn running_again_is_a_no_op() {
    let mut qn = random_network(3, 2, 2., 300, 4);
    let first = qn.run().unwrap();
    let snapshot = qn.jobs().to_vec();

    let second = qn.run().unwrap();
    assert_eq!(first, second);
    assert_eq!(qn.jobs(), snapshot.as_slice());
    assert!(qn.is_idle());
}

#[test]
fn same_seed_same_run() {
    let mut a = random_network(5, 5, 3.3, 1000, 77);
    let mut b = random_network(5, 5, 3.3, 1000, 77);
    assert_eq!(a.run().unwrap(), b.run().unwrap());
    assert_eq!(a.jobs(), b.jobs());
}

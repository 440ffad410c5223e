//! Estado global do scheduler e API de threads.
//!
//! Todo o estado mutável compartilhado com o handler do timer (registro, fila
//! de prontas, fila de sleep, tabela de donos de locks, thread atual) fica em
//! um único `Scheduler` atrás de `SCHED`. O `Spinlock` desliga interrupções
//! enquanto está travado; em uma CPU só isso basta.
//!
//! Nenhuma função aqui troca de contexto com `SCHED` travado: a decisão é
//! tomada dentro de `with` e a troca acontece depois, em `switch::schedule`.

use super::donation::LockId;
use super::runqueue::RunQueue;
use super::sleep_queue::SleepQueue;
use super::switch::schedule;
use crate::arch::{ContextOps, Cpu, CpuContext, CpuOps};
use crate::core::interrupt::{self, IrqGuard};
use crate::sched::config::{MAX_THREADS, PRI_DEFAULT, PRI_MAX, PRI_MIN, TIME_SLICE};
use crate::sched::task::lifecycle::{thread_entry, Reaper};
use crate::sched::task::{
    KernelStack, QueueTag, Registry, Thread, ThreadBody, ThreadFlags, ThreadName, ThreadRef,
    ThreadState, TickStats, Tid,
};
use crate::sched::SchedError;
use crate::sync::{Semaphore, Spinlock};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;

/// O scheduler. `None` até `init`.
static SCHED: Spinlock<Option<Scheduler>> = Spinlock::new(None);

pub(crate) struct Scheduler {
    pub(crate) threads: Registry,
    pub(crate) ready: RunQueue,
    pub(crate) sleepers: SleepQueue,
    /// Dono de cada lock travado
    pub(crate) holders: BTreeMap<LockId, ThreadRef>,
    pub(crate) reaper: Reaper,
    /// Thread em Running
    pub(crate) current: ThreadRef,
    pub(crate) idle: Option<ThreadRef>,
    /// Raiz de paginação do kernel, ativa para threads sem espaço próprio
    pub(crate) kernel_root: u64,
    /// Ticks desde o último dispatch
    pub(crate) slice: u64,
    pub(crate) stats: TickStats,
    next_tid: u32,
}

/// Executa `f` com o scheduler travado.
pub(crate) fn with<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R {
    let mut guard = SCHED.lock();
    match guard.as_mut() {
        Some(sched) => f(sched),
        None => panic!("(Sched) scheduler não inicializado"),
    }
}

fn check_priority(priority: u8) {
    assert!(
        (PRI_MIN..=PRI_MAX).contains(&priority),
        "(Sched) prioridade fora da faixa"
    );
}

/// Coloca uma thread Blocked na fila de prontas.
///
/// Recebe os campos separados para ser usada dentro da passada de sleep.
fn make_ready_in(threads: &mut Registry, ready: &mut RunQueue, r: ThreadRef) {
    let Some(thread) = threads.get_mut(r) else {
        panic!("(Sched) unblock de thread destruída");
    };
    assert!(
        thread.state == ThreadState::Blocked,
        "(Sched) unblock de thread que não está bloqueada"
    );
    assert!(
        thread.queue != QueueTag::Ready,
        "(Sched) thread já está na fila de prontas"
    );
    assert!(!thread.is_idle(), "(Sched) idle não entra na fila de prontas");

    thread.state = ThreadState::Ready;
    thread.queue = QueueTag::Ready;
    thread.wake_at = None;
    ready.enqueue(r, thread.priority);
}

impl Scheduler {
    fn new(initial: Box<Thread>, kernel_root: u64) -> Result<Self, SchedError> {
        let mut threads = Registry::new(MAX_THREADS);
        let current = threads.insert(initial)?;

        let mut sched = Self {
            threads,
            ready: RunQueue::new(),
            sleepers: SleepQueue::new(),
            holders: BTreeMap::new(),
            reaper: Reaper::new(),
            current,
            idle: None,
            kernel_root,
            slice: 0,
            stats: TickStats::new(),
            next_tid: 2,
        };
        sched.reserve(1)?;
        Ok(sched)
    }

    pub(crate) fn thread(&self, r: ThreadRef) -> &Thread {
        match self.threads.get(r) {
            Some(thread) => thread,
            None => panic!("(Sched) referência para thread destruída"),
        }
    }

    pub(crate) fn thread_mut(&mut self, r: ThreadRef) -> &mut Thread {
        match self.threads.get_mut(r) {
            Some(thread) => thread,
            None => panic!("(Sched) referência para thread destruída"),
        }
    }

    pub(crate) fn current_thread(&self) -> &Thread {
        self.thread(self.current)
    }

    pub(crate) fn is_idle(&self, r: ThreadRef) -> bool {
        self.idle == Some(r)
    }

    /// Filas com espaço para `threads` entradas: o caminho de interrupção
    /// nunca aloca.
    fn reserve(&mut self, threads: usize) -> Result<(), SchedError> {
        self.ready.reserve(threads)?;
        self.sleepers.reserve(threads)?;
        self.reaper.reserve(threads)
    }

    /// Registra uma thread nova. Threads comuns já saem Ready.
    fn admit(
        &mut self,
        name: &str,
        priority: u8,
        flags: ThreadFlags,
        stack: KernelStack,
        context: CpuContext,
        body: ThreadBody,
    ) -> Result<(ThreadRef, Tid), SchedError> {
        let tid = Tid::new(self.next_tid);
        let mut thread = Box::new(Thread::new(tid, name, priority, flags, context));
        thread.stack = Some(stack);
        thread.body = Some(body);

        self.reserve(self.threads.len() + 1)?;
        let r = self.threads.insert(thread)?;
        self.next_tid += 1;

        if flags.contains(ThreadFlags::IDLE) {
            self.idle = Some(r);
        } else {
            self.make_ready(r);
        }
        Ok((r, tid))
    }

    /// Raiz que `r` usa: a própria ou a do kernel.
    pub(crate) fn root_of(&self, r: ThreadRef) -> u64 {
        self.thread(r).address_space.unwrap_or(self.kernel_root)
    }

    pub(crate) fn make_ready(&mut self, r: ThreadRef) {
        make_ready_in(&mut self.threads, &mut self.ready, r);
    }

    /// Thread atual sai de Running para `state`. Ready também a coloca na
    /// fila de prontas.
    pub(crate) fn leave_running(&mut self, state: ThreadState, voluntary: bool) {
        let current = self.current;
        let idle = self.is_idle(current);
        let thread = self.thread_mut(current);
        assert!(
            thread.state == ThreadState::Running,
            "(Sched) thread atual não está em Running"
        );

        if voluntary {
            thread.accounting.voluntary_switches += 1;
        } else {
            thread.accounting.involuntary_switches += 1;
        }

        // A idle nunca fica na fila: "pronta" para ela é "bloqueada até ser
        // o último recurso do dispatcher".
        if state == ThreadState::Ready && idle {
            thread.state = ThreadState::Blocked;
            return;
        }

        thread.state = state;
        if state == ThreadState::Ready {
            let priority = thread.priority;
            thread.queue = QueueTag::Ready;
            self.ready.enqueue(current, priority);
        }
    }

    /// Existe thread pronta que deveria estar rodando no lugar da atual?
    pub(crate) fn should_preempt(&self) -> bool {
        match self.ready.peek_highest_priority() {
            None => false,
            Some(_) if self.is_idle(self.current) => true,
            Some(highest) => highest > self.current_thread().priority,
        }
    }

    /// Trabalho do tick. Retorna `true` se a thread atual deve ceder a CPU
    /// quando a interrupção retornar.
    fn on_tick(&mut self, now: u64) -> bool {
        let current = self.current;
        let thread = self.thread_mut(current);
        thread.accounting.ticks += 1;
        let flags = thread.flags;
        self.stats.account(flags);

        self.slice += 1;
        let expired = self.slice >= TIME_SLICE;

        if self.sleepers.is_due(now) {
            let threads = &mut self.threads;
            let ready = &mut self.ready;
            let woken = self
                .sleepers
                .wake_due(now, |r| make_ready_in(threads, ready, r));
            crate::ktrace!("(Sleep) Threads acordadas:", woken);
        }

        expired || self.should_preempt()
    }
}

// =============================================================================
// INICIALIZAÇÃO
// =============================================================================

/// Transforma o código em execução na thread "main" (TID 1).
///
/// Interrupções devem estar desligadas. Chamar de novo descarta todo o estado
/// anterior.
pub fn init() {
    assert!(
        !Cpu::are_interrupts_enabled(),
        "(Sched) init com interrupções habilitadas"
    );

    let mut main = Box::new(Thread::new(
        Tid::new(1),
        "main",
        PRI_DEFAULT,
        ThreadFlags::INITIAL,
        CpuContext::bootstrap(),
    ));
    main.state = ThreadState::Running;

    let sched = match Scheduler::new(main, Cpu::address_space()) {
        Ok(sched) => sched,
        Err(err) => panic!("(Sched) falha ao registrar a thread inicial: {}", err),
    };
    *SCHED.lock() = Some(sched);

    crate::kinfo!("(Sched) Scheduler inicializado. Thread inicial TID:", 1u32);
}

/// Cria a thread ociosa, liga as interrupções e espera a idle rodar uma vez.
pub fn start() {
    let started = Arc::new(Semaphore::new(0));
    let signal = Arc::clone(&started);

    let stack = match KernelStack::new() {
        Ok(stack) => stack,
        Err(err) => panic!("(Sched) falha ao criar a idle: {}", err),
    };
    let context = match CpuContext::prepare(&stack, thread_entry) {
        Ok(context) => context,
        Err(err) => panic!("(Sched) falha ao criar a idle: {}", err),
    };
    let body: ThreadBody = Box::new(move || super::idle::idle_loop(signal));

    let admitted = with(|s| s.admit("idle", PRI_MIN, ThreadFlags::IDLE, stack, context, body));
    if let Err(err) = admitted {
        panic!("(Sched) falha ao criar a idle: {}", err);
    }

    interrupt::enable();
    started.down();

    crate::kinfo!("(Sched) Scheduler iniciado");
}

// =============================================================================
// CRIAÇÃO
// =============================================================================

/// Cria uma thread que executa `body` com prioridade `priority`.
///
/// A thread nasce Blocked e sai daqui Ready; se for mais prioritária que a
/// chamadora, roda antes de `spawn` retornar.
pub fn spawn<F>(name: &str, priority: u8, body: F) -> Result<Tid, SchedError>
where
    F: FnOnce() + Send + 'static,
{
    check_priority(priority);
    assert!(
        !interrupt::in_interrupt(),
        "(Sched) spawn em contexto de interrupção"
    );

    let stack = KernelStack::new()?;
    let context = CpuContext::prepare(&stack, thread_entry)?;
    let body: ThreadBody = Box::new(body);

    let (_, tid) = with(|s| s.admit(name, priority, ThreadFlags::empty(), stack, context, body))
        .map_err(|err| {
            crate::kwarn!("(Sched) spawn falhou:"; err.as_str());
            err
        })?;

    crate::kdebug!("(Sched) Thread criada TID:", tid.as_u32());
    preempt_check();
    Ok(tid)
}

/// Variante com ponteiro de função e argumento.
pub fn create(name: &str, priority: u8, entry: fn(usize), aux: usize) -> Result<Tid, SchedError> {
    spawn(name, priority, move || entry(aux))
}

/// Chamado pelo trampolim na primeira execução da thread.
pub(crate) fn take_current_body() -> Option<ThreadBody> {
    with(|s| {
        let current = s.current;
        s.thread_mut(current).body.take()
    })
}

// =============================================================================
// CONSULTAS
// =============================================================================

pub(crate) fn current_ref() -> ThreadRef {
    with(|s| s.current)
}

pub fn current_tid() -> Tid {
    with(|s| s.current_thread().tid)
}

pub fn current_name() -> ThreadName {
    with(|s| s.current_thread().name)
}

/// Prioridade efetiva da thread atual
pub fn get_priority() -> u8 {
    with(|s| s.current_thread().priority)
}

/// Prioridade efetiva de `tid`, se viva.
pub fn priority_of(tid: Tid) -> Option<u8> {
    with(|s| s.threads.find(tid).map(|r| s.thread(r).priority))
}

/// Estado de `tid`, se viva.
pub fn state_of(tid: Tid) -> Option<ThreadState> {
    with(|s| s.threads.find(tid).map(|r| s.thread(r).state))
}

/// Threads no registro (inclui mortas ainda não liberadas).
pub fn thread_count() -> usize {
    with(|s| s.threads.len())
}

/// Reduz o limite de threads vivas.
#[cfg(test)]
pub(crate) fn limit_threads(limit: usize) {
    with(|s| s.threads.set_limit(limit));
}

pub fn stats() -> TickStats {
    with(|s| s.stats)
}

pub fn print_stats() {
    let stats = stats();
    crate::kinfo!("(Sched) Ticks idle:", stats.idle);
    crate::kinfo!("(Sched) Ticks kernel:", stats.kernel);
    crate::kinfo!("(Sched) Ticks usuário:", stats.user);
}

/// Maior prioridade efetiva entre `candidates`; em empate, a primeira.
/// Retorna o índice. Referências mortas são ignoradas.
pub(crate) fn pick_highest<'a>(candidates: impl Iterator<Item = &'a ThreadRef>) -> Option<usize> {
    with(|s| {
        let mut best: Option<(usize, u8)> = None;
        for (index, &r) in candidates.enumerate() {
            let Some(thread) = s.threads.get(r) else {
                continue;
            };
            if best.map_or(true, |(_, p)| thread.priority > p) {
                best = Some((index, thread.priority));
            }
        }
        best.map(|(index, _)| index)
    })
}

// =============================================================================
// TRANSIÇÕES
// =============================================================================

/// Bloqueia a thread atual até alguém chamar `unblock`.
///
/// Interrupções devem estar desligadas.
pub fn block_current() {
    block_current_on(QueueTag::None);
}

/// Bloqueia registrando em qual contêiner a thread ficou.
pub(crate) fn block_current_on(queue: QueueTag) {
    assert!(
        !interrupt::in_interrupt(),
        "(Sched) bloqueio em contexto de interrupção"
    );
    assert!(
        !Cpu::are_interrupts_enabled(),
        "(Sched) block_current com interrupções habilitadas"
    );

    with(|s| {
        s.leave_running(ThreadState::Blocked, true);
        let current = s.current;
        s.thread_mut(current).queue = queue;
    });
    schedule();
}

/// Blocked -> Ready. Não preempta a thread atual.
///
/// Só vale para threads paradas em `block_current`. Uma thread dormindo ou
/// esperando um semáforo pertence àquela fila, e acordá-la por fora é
/// violação de contrato.
pub fn unblock(tid: Tid) {
    let _irq = IrqGuard::new();
    with(|s| {
        let Some(r) = s.threads.find(tid) else {
            panic!("(Sched) unblock de TID inexistente");
        };
        let thread = s.thread(r);
        assert!(
            thread.state != ThreadState::Blocked || thread.queue == QueueTag::None,
            "(Sched) unblock de thread presa em fila de espera"
        );
        s.make_ready(r);
    });
}

pub(crate) fn unblock_ref(r: ThreadRef) {
    with(|s| s.make_ready(r));
}

/// Cede a CPU para outra thread pronta de prioridade >= a atual.
pub fn yield_now() {
    assert!(
        !interrupt::in_interrupt(),
        "(Sched) yield em contexto de interrupção"
    );
    let _irq = IrqGuard::new();
    with(|s| s.leave_running(ThreadState::Ready, true));
    schedule();
}

/// Yield involuntário, na saída de uma interrupção.
pub(crate) fn preempt_current() {
    with(|s| s.leave_running(ThreadState::Ready, false));
    schedule();
}

/// Preempta se alguma thread pronta tem prioridade maior que a atual. Dentro
/// de um handler, adia para a saída da interrupção.
pub(crate) fn preempt_check() {
    if !with(|s| s.should_preempt()) {
        return;
    }
    if interrupt::in_interrupt() {
        interrupt::yield_on_return();
    } else {
        yield_now();
    }
}

/// Termina a thread atual. A memória é liberada na próxima passada.
pub fn exit_current() -> ! {
    assert!(
        !interrupt::in_interrupt(),
        "(Sched) exit em contexto de interrupção"
    );
    interrupt::disable();

    with(|s| {
        let current = s.current;
        assert!(!s.is_idle(current), "(Sched) a idle não pode terminar");
        if s.holders.values().any(|&h| h == current) {
            crate::kwarn!("(Sched) thread terminou segurando lock TID:", s.thread(current).tid.as_u32());
        }
        s.leave_running(ThreadState::Dying, true);
        let thread = s.thread_mut(current);
        thread.donors.clear();
        crate::kdebug!("(Sched) Thread terminou TID:", thread.tid.as_u32());
    });
    schedule();

    panic!("(Sched) thread morta voltou a executar");
}

/// Dorme até `jiffies >= deadline`.
pub(crate) fn sleep_until(deadline: u64) {
    assert!(
        !interrupt::in_interrupt(),
        "(Sleep) sleep em contexto de interrupção"
    );
    let _irq = IrqGuard::new();

    if crate::core::time::jiffies::get_jiffies() >= deadline {
        return;
    }

    with(|s| {
        let current = s.current;
        assert!(!s.is_idle(current), "(Sleep) a idle não pode dormir");
        s.leave_running(ThreadState::Blocked, true);
        let thread = s.thread_mut(current);
        thread.queue = QueueTag::Sleep;
        thread.wake_at = Some(deadline);
        s.sleepers.insert(current, deadline);
    });
    schedule();
}

// =============================================================================
// PRIORIDADE
// =============================================================================

/// Muda a prioridade base da thread atual.
///
/// A prioridade efetiva é recalculada na hora (doações recebidas continuam
/// valendo) e, se ela caiu abaixo de uma thread pronta, a atual cede a CPU.
pub fn set_priority(priority: u8) {
    check_priority(priority);
    {
        let _irq = IrqGuard::new();
        with(|s| {
            let current = s.current;
            s.thread_mut(current).base_priority = priority;
            s.refresh_priority(current);
        });
    }
    preempt_check();
}

/// Instala (ou remove) o espaço de endereçamento de `tid`. Se for a thread
/// atual, ativa na hora; `None` volta para o espaço do kernel. Retorna
/// `false` se a thread não existe.
///
/// # Safety
/// `root`, se presente, deve apontar para uma tabela de páginas válida que
/// mapeie o kernel e continuar válida enquanto `tid` existir ou até ser
/// trocada: o dispatcher a carrega a cada vez que `tid` volta a rodar.
pub unsafe fn set_address_space(tid: Tid, root: Option<u64>) -> bool {
    let _irq = IrqGuard::new();
    with(|s| {
        let Some(r) = s.threads.find(tid) else {
            return false;
        };
        let thread = s.thread_mut(r);
        thread.address_space = root;
        thread.flags.set(ThreadFlags::USER, root.is_some());

        if r == s.current {
            // SAFETY: raiz do kernel ou a entregue pelo chamador, válida pelo
            // contrato acima.
            unsafe { Cpu::switch_address_space(s.root_of(r)) };
        }
        true
    })
}

// =============================================================================
// TICK
// =============================================================================

/// Entrada do scheduler no handler do timer. Antes de `init` é ignorado.
pub fn tick(now: u64) {
    let preempt = {
        let mut guard = SCHED.lock();
        match guard.as_mut() {
            Some(sched) => sched.on_tick(now),
            None => return,
        }
    };

    if preempt {
        interrupt::yield_on_return();
    }
}

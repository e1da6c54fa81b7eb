pub mod core;
pub mod analysis;
pub mod index;
pub mod parallel;
pub mod crawler;
pub mod query;
pub mod writer;
pub mod driver;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                            WEBDEX ARCHITECTURE                               │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── INGESTION ─────────────────────────────────────┐
│                                                                              │
│  ┌────────────────────────┐        ┌──────────────────────────────────────┐  │
│  │ struct TextIndexer     │        │ struct WebCrawler                    │  │
│  │ • analyzer: Arc<>      │        │ • state: Arc<CrawlState>             │  │
│  │ • progress: AtomicUsize│        │   - visited: Mutex<HashSet<Url>>     │  │
│  │ one task per file      │        │   - fetcher: Arc<dyn Fetcher>        │  │
│  └───────────┬────────────┘        │   - limit: usize                     │  │
│              │                     │ • queue: Arc<TaskQueue>              │  │
│              │                     └──────────────┬───────────────────────┘  │
│              │  local InvertedIndex per task      │                          │
│              └──────────────┬─────────────────────┘                          │
│                             ▼ merge_from                                     │
└─────────────────────────────┼────────────────────────────────────────────────┘
                              │
┌─────────────────────────────┼──── INDEX ─────────────────────────────────────┐
│  ┌──────────────────────────▼───────────────────────┐  ┌──────────────────┐  │
│  │ struct ConcurrentIndex                           │  │ trait SearchIndex│  │
│  │ • inner: RwLock<InvertedIndex>                   │  │ • search()       │  │
│  └──────────────────────────┬───────────────────────┘  └──────────────────┘  │
│  ┌──────────────────────────▼───────────────────────┐                        │
│  │ struct InvertedIndex                             │                        │
│  │ • index: BTreeMap<word, BTreeMap<loc, {pos}>>    │                        │
│  │ • counts: BTreeMap<loc, usize>                   │                        │
│  └──────────────────────────────────────────────────┘                        │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── QUERY ─────────────────────────────────────────┐
│  ┌──────────────────────────────┐   ┌──────────────────────────────────────┐ │
│  │ struct QueryEngine           │   │ struct QueryCache                    │ │
│  │ • index: Arc<dyn SearchIndex>│──▶│ • cache: Mutex<BTreeMap<key, cell>>  │ │
│  │ • analyzer: Arc<Analyzer>    │   │ • hit_count / miss_count             │ │
│  │ • queue: Option<Arc<Queue>>  │   └──────────────────────────────────────┘ │
│  └──────────────────────────────┘                                            │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── EXECUTION ─────────────────────────────────────┐
│  ┌──────────────────────────────────────────────────────────────────────┐    │
│  │ struct TaskQueue                                                     │    │
│  │ • sender: Mutex<Option<Sender<Task>>>   crossbeam channel            │    │
│  │ • workers: Mutex<Vec<JoinHandle<()>>>                                │    │
│  │ • pending: Arc<Pending>                 atomic counter + condvar     │    │
│  └──────────────────────────────────────────────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────┘
*/
